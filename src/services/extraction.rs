//! Indicator extraction from unstructured documents

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

use crate::entities::Indicator;

use super::ServiceError;

/// A document handed to an extractor
#[derive(Debug, Clone)]
pub struct ExtractionInput {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Produces candidate indicators from a document
///
/// Output is untrusted: callers load it into an ingestion session, which
/// validates it like any uploaded spreadsheet.
#[async_trait]
pub trait IndicatorExtractor: Send + Sync {
    async fn extract(&self, input: &ExtractionInput) -> Result<Vec<Indicator>, ServiceError>;

    fn name(&self) -> &str;
}

/// Extractor returning fixed sample indicators after a delay
#[derive(Debug, Clone)]
pub struct MockExtractor {
    delay: Duration,
}

impl MockExtractor {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }

    fn sample() -> Vec<Indicator> {
        vec![
            Indicator::new("E1.1", "Greenhouse gas emissions (Scope 1)")
                .with_category("Environment")
                .with_subcategory("Emissions")
                .with_source("AI Extracted"),
            Indicator::new("E1.2", "Greenhouse gas emissions (Scope 2)")
                .with_category("Environment")
                .with_subcategory("Emissions")
                .with_source("AI Extracted"),
            Indicator::new("S1.1", "Employee diversity metrics")
                .with_category("Social")
                .with_subcategory("Workforce")
                .with_source("AI Extracted"),
        ]
    }
}

impl Default for MockExtractor {
    fn default() -> Self {
        Self::new(Duration::from_secs(2))
    }
}

#[async_trait]
impl IndicatorExtractor for MockExtractor {
    async fn extract(&self, input: &ExtractionInput) -> Result<Vec<Indicator>, ServiceError> {
        tracing::debug!(file = %input.filename, bytes = input.bytes.len(), "mock extraction started");
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(Self::sample())
    }

    fn name(&self) -> &str {
        "mock-extractor"
    }
}

/// Run an extraction that gives up at `timeout` or when `cancel` resolves
///
/// On timeout or cancellation the in-flight extraction is dropped and its
/// result is never observed.
pub async fn extract_with_deadline<C>(
    extractor: &dyn IndicatorExtractor,
    input: &ExtractionInput,
    timeout: Duration,
    cancel: C,
) -> Result<Vec<Indicator>, ServiceError>
where
    C: Future<Output = ()>,
{
    tokio::select! {
        result = tokio::time::timeout(timeout, extractor.extract(input)) => match result {
            Ok(indicators) => indicators,
            Err(_) => {
                tracing::warn!(extractor = extractor.name(), ?timeout, "extraction timed out");
                Err(ServiceError::Timeout { timeout })
            }
        },
        _ = cancel => {
            tracing::warn!(extractor = extractor.name(), "extraction cancelled");
            Err(ServiceError::Cancelled)
        }
    }
}
