//! Typed access to the gallery, photo and testimonial endpoints.

use tracing::{debug, instrument};

use studio_core::error::InvalidInputError;
use studio_core::{Photo, Result, Testimonial, TestimonialSubmission};

use crate::http::ApiRequest;
use crate::http::endpoints::{
    self, ADMIN_PHOTOS, GALLERY, ListEnvelope, TESTIMONIALS_ALL, TESTIMONIALS_APPROVED,
    TESTIMONIALS_SUBMIT,
};
use crate::session::AuthClient;

/// Reject ids that would escape their path segment.
fn resource_id(id: &str) -> Result<&str> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(id)
    } else {
        Err(InvalidInputError::Other {
            message: format!("invalid resource id '{}'", id),
        }
        .into())
    }
}

impl AuthClient {
    /// Photos shown in the public gallery.
    #[instrument(skip(self))]
    pub async fn gallery(&self) -> Result<Vec<Photo>> {
        debug!("Listing gallery");
        let list: ListEnvelope<Photo> = self.get_json(GALLERY).await?;
        Ok(list.into_vec())
    }

    /// Every photo, as seen from the admin dashboard.
    #[instrument(skip(self))]
    pub async fn admin_photos(&self) -> Result<Vec<Photo>> {
        debug!("Listing admin photos");
        let list: ListEnvelope<Photo> = self.get_json(ADMIN_PHOTOS).await?;
        Ok(list.into_vec())
    }

    /// Delete a photo (admin).
    #[instrument(skip(self))]
    pub async fn delete_photo(&self, id: &str) -> Result<()> {
        debug!("Deleting photo");
        self.delete(&endpoints::admin_photo(resource_id(id)?)).await
    }

    /// Approved testimonials shown on the public site.
    #[instrument(skip(self))]
    pub async fn testimonials(&self) -> Result<Vec<Testimonial>> {
        debug!("Listing approved testimonials");
        let list: ListEnvelope<Testimonial> = self.get_json(TESTIMONIALS_APPROVED).await?;
        Ok(list.into_vec())
    }

    /// Every testimonial, including those awaiting approval (admin).
    #[instrument(skip(self))]
    pub async fn all_testimonials(&self) -> Result<Vec<Testimonial>> {
        debug!("Listing all testimonials");
        let list: ListEnvelope<Testimonial> = self.get_json(TESTIMONIALS_ALL).await?;
        Ok(list.into_vec())
    }

    /// Approve a testimonial for the public site (admin).
    #[instrument(skip(self))]
    pub async fn approve_testimonial(&self, id: &str) -> Result<()> {
        debug!("Approving testimonial");
        let path = endpoints::approve_testimonial(resource_id(id)?);
        self.send(ApiRequest::put(path)).await.map(|_| ())
    }

    /// Submit a testimonial from the public site.
    #[instrument(skip(self, submission), fields(name = %submission.name))]
    pub async fn submit_testimonial(&self, submission: &TestimonialSubmission) -> Result<()> {
        debug!("Submitting testimonial");
        let body = serde_json::to_value(submission).map_err(|e| InvalidInputError::Other {
            message: e.to_string(),
        })?;
        self.send(ApiRequest::post(TESTIMONIALS_SUBMIT).json(body))
            .await
            .map(|_| ())
    }
}
