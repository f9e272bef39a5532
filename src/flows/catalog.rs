//! Product listing and deletion.
//!
//! Deleting a listing is two independent requests: the product record, then
//! its stored image. The second runs regardless of the first and neither
//! outcome changes the other.

use tracing::{error, info, warn};

use crate::api::{Endpoint, Product, Transport};
use crate::errors::ClientError;
use crate::forms::{Notice, NoticeLevel, Notifier};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Deleted,
    /// Server answered with a non-200 status.
    Failed(u16),
    /// Request never completed.
    Errored(String),
    /// Nothing to delete.
    Skipped,
}

impl StepOutcome {
    pub fn is_deleted(&self) -> bool {
        matches!(self, StepOutcome::Deleted)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionReport {
    pub product: StepOutcome,
    pub image: StepOutcome,
}

pub struct Catalog<'a, T: Transport + ?Sized> {
    transport: &'a T,
}

impl<'a, T: Transport + ?Sized> Catalog<'a, T> {
    pub fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    pub fn fetch_all(&self) -> Result<Vec<Product>, ClientError> {
        let endpoint = Endpoint::all_products();
        let response = self.transport.send(&endpoint.request())?;
        if !response.is_ok() {
            warn!(status = response.status, "product listing failed");
            return Err(ClientError::UnexpectedStatus {
                status: response.status,
                path: endpoint.path,
            });
        }
        let products: Vec<Product> = response.json()?;
        info!(count = products.len(), "fetched products");
        Ok(products)
    }

    /// Listings whose `user_id` matches the given owner.
    pub fn fetch_owned_by(&self, user_id: &str) -> Result<Vec<Product>, ClientError> {
        Ok(self
            .fetch_all()?
            .into_iter()
            .filter(|product| product.is_owned_by(user_id))
            .collect())
    }

    pub fn delete_listing(&self, product: &Product, notifier: &mut dyn Notifier) -> DeletionReport {
        let product_outcome = self.delete(Endpoint::delete_product(&product.id));
        let (level, title) = match &product_outcome {
            StepOutcome::Deleted => (NoticeLevel::Success, "Product deleted successfully."),
            StepOutcome::Errored(_) => (NoticeLevel::Error, "An error occurred."),
            _ => (NoticeLevel::Error, "Error deleting product."),
        };
        notifier.notify(&Notice::toast(level, title));

        let image_outcome = match product.image.as_deref() {
            Some(image) => {
                let outcome = self.delete(Endpoint::delete_file(image));
                let (level, title) = match &outcome {
                    StepOutcome::Deleted => {
                        (NoticeLevel::Success, "Product's Image deleted successfully.")
                    }
                    StepOutcome::Errored(_) => {
                        (NoticeLevel::Error, "An error occurred in image deletion.")
                    }
                    _ => (NoticeLevel::Error, "Error deleting product's Image."),
                };
                notifier.notify(&Notice::toast(level, title));
                outcome
            }
            None => StepOutcome::Skipped,
        };

        DeletionReport {
            product: product_outcome,
            image: image_outcome,
        }
    }

    fn delete(&self, endpoint: Endpoint) -> StepOutcome {
        match self.transport.send(&endpoint.request()) {
            Ok(response) if response.is_ok() => {
                info!(path = %endpoint.path, "deleted");
                StepOutcome::Deleted
            }
            Ok(response) => {
                warn!(path = %endpoint.path, status = response.status, "delete rejected");
                StepOutcome::Failed(response.status)
            }
            Err(err) => {
                error!(path = %endpoint.path, error = %err, "delete request failed");
                StepOutcome::Errored(err.message)
            }
        }
    }
}
