pub mod decode;
pub mod engine;
pub mod hashes;
pub mod ndjson;
pub mod profile;
pub mod report;

pub mod prelude {
    pub use crate::engine::Engine;
    pub use crate::profile::ImportRecord;
}
