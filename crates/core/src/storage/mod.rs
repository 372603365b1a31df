mod error;
mod filter;
mod http_mapping;
mod traits;
mod types;

pub use error::{RepositoryError, Result};
pub use filter::CompiledFilter;
pub use http_mapping::repository_error_to_status_code;
pub use traits::{CommentRepository, Repository};
pub use types::{FilterValue, IdFilter, ListQuery};
