use log::{debug, error};

use crate::{
    BodyPartID, GenerateError, MergeRequest, MergeResult, ReadError, catalog::Catalog, merge,
};

/// Read access to the exercise catalog. `body_parts` narrows the result to
/// the records one request needs; implementations may return more.
#[allow(async_fn_in_trait)]
pub trait CatalogRepository {
    async fn read_catalog(&self, body_parts: &[BodyPartID]) -> Result<Catalog, ReadError>;
}

#[allow(async_fn_in_trait)]
pub trait CourseService {
    async fn generate_course(&self, request: &MergeRequest) -> Result<MergeResult, GenerateError>;
}

pub struct Service<R> {
    repository: R,
}

impl<R: CatalogRepository> Service<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

macro_rules! log_on_error {
    ($func: expr, $error: ident, $action: literal, $entity: literal) => {{
        let result = $func.await;
        match result {
            Ok(_) => {}
            Err(ref err) => match err {
                $error::Storage(crate::StorageError::NoConnection) => {
                    debug!("failed to {} {}: {err}", $action, $entity);
                }
                _ => {
                    error!("failed to {} {}: {err}", $action, $entity);
                }
            },
        }
        result
    }};
}

impl<R: CatalogRepository> CourseService for Service<R> {
    async fn generate_course(&self, request: &MergeRequest) -> Result<MergeResult, GenerateError> {
        let body_parts: Vec<BodyPartID> = request
            .body_parts
            .iter()
            .map(|selection| selection.body_part_id)
            .collect();
        let catalog = log_on_error!(
            self.repository.read_catalog(&body_parts),
            ReadError,
            "read",
            "catalog"
        )?;
        Ok(merge(&catalog, request)?)
    }
}
