//! Input resolution
//!
//! Routes a validated `DocumentInput` to the payload decoder or the object
//! resolver and yields one `ResolvedDocument`.

use crate::document::ResolvedDocument;
use crate::error::Result;

use super::object::ObjectResolver;
use super::payload::PayloadDecoder;
use super::request::DocumentInput;

#[derive(Clone)]
pub struct InputResolver {
    decoder: PayloadDecoder,
    objects: ObjectResolver,
}

impl InputResolver {
    pub fn new(decoder: PayloadDecoder, objects: ObjectResolver) -> Self {
        Self { decoder, objects }
    }

    pub async fn resolve(&self, input: &DocumentInput) -> Result<ResolvedDocument> {
        let document = match input {
            DocumentInput::Inline(payload) => self.decoder.decode(&payload.encoded)?,
            DocumentInput::Stored(reference) => self.objects.resolve(&reference.object_name).await?,
        };

        tracing::info!(
            "Resolved {} ({} bytes, {}, sha256={})",
            document.source_description(),
            document.len(),
            document.media_type(),
            document.sha256()
        );

        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::ingest::object::tests::CountingStore;
    use crate::ingest::object::RetryPolicy;
    use crate::ingest::request::{ExtractRequest, InlinePayload, StoredReference};
    use std::sync::Arc;

    fn resolver(store: Arc<CountingStore>) -> InputResolver {
        InputResolver::new(
            PayloadDecoder::new(1024),
            ObjectResolver::new(store, RetryPolicy::default()),
        )
    }

    #[tokio::test]
    async fn test_inline_payload_performs_no_io() {
        let store = Arc::new(CountingStore::default());
        let input = DocumentInput::Inline(InlinePayload {
            encoded: "data:application/pdf;base64,JVBERi0xLjc=".into(),
        });

        let doc = resolver(store.clone()).resolve(&input).await.unwrap();
        assert_eq!(doc.media_type(), "application/pdf");
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_stored_reference_reads_once() {
        let store = Arc::new(CountingStore::default().with_object("doc.pdf", b"%PDF-1.7"));
        let input = DocumentInput::Stored(StoredReference {
            object_name: "doc.pdf".into(),
        });

        let doc = resolver(store.clone()).resolve(&input).await.unwrap();
        assert_eq!(doc.bytes(), b"%PDF-1.7");
        assert_eq!(store.calls(), 1);
    }

    #[tokio::test]
    async fn test_contradictory_request_fails_before_io() {
        let store = Arc::new(CountingStore::default().with_object("doc.pdf", b"%PDF-1.7"));
        let resolver = resolver(store.clone());

        let request = ExtractRequest {
            image_data: Some("data:application/pdf;base64,JVBERi0xLjc=".into()),
            file_name: Some("doc.pdf".into()),
            ..Default::default()
        };

        let result = match request.into_parts() {
            Ok((input, _)) => resolver.resolve(&input).await.map(|_| ()),
            Err(e) => Err(e),
        };

        assert!(matches!(result, Err(AppError::InvalidInput(_))));
        assert_eq!(store.calls(), 0);

        // The same object is reachable once the request names only it
        let valid = ExtractRequest {
            file_name: Some("doc.pdf".into()),
            ..Default::default()
        };
        let (input, _) = valid.into_parts().unwrap();
        resolver.resolve(&input).await.unwrap();
        assert_eq!(store.calls(), 1);
    }
}
