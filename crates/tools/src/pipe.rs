/// Left-to-right composition of same-typed steps.
///
/// `Pipeline::new().then(f).then(g).run(x)` is `g(f(x))`. An empty pipeline
/// is the identity.
pub struct Pipeline<T> {
    steps: Vec<Box<dyn Fn(T) -> T>>,
}

impl<T> Pipeline<T> {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    pub fn then<F>(mut self, step: F) -> Self
    where
        F: Fn(T) -> T + 'static,
    {
        self.steps.push(Box::new(step));
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn run(&self, input: T) -> T {
        self.steps.iter().fold(input, |value, step| step(value))
    }
}

impl<T> Default for Pipeline<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Compose `steps` into a single function, applied first to last.
pub fn pipe<T>(steps: Vec<Box<dyn Fn(T) -> T>>) -> impl Fn(T) -> T {
    move |input| steps.iter().fold(input, |value, step| step(value))
}
