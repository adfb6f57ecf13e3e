pub mod bytes;
pub mod enumeration;
pub mod pipe;
pub mod query;
pub mod random;
pub mod relaxed_json;
pub mod types;

pub use bytes::{ByteSize, convert_bytes};
pub use enumeration::{Enum, EnumError};
pub use pipe::{Pipeline, pipe};
pub use query::{opt_chain, query_path};
pub use random::{randid, randid_with_pool};
pub use relaxed_json::{parse_relaxed, relax_json};
pub use types::type_of;
