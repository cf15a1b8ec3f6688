//! Probe client trait and HTTP implementation.

use crate::error::{ProbeError, Result};
use crate::identity::IdentityPool;
use async_trait::async_trait;
use namescout_core::{Candidate, Outcome, ProbeConfig, CANDIDATE_PLACEHOLDER};
use reqwest::header::USER_AGENT;
use reqwest::{Client, StatusCode};

/// Classifies a candidate against a remote service.
///
/// Implementations perform a single attempt per call and never retry;
/// backoff is the caller's concern. Implementations must be thread-safe
/// (Send + Sync) since every worker shares one prober.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Probe one candidate and map the response to an [`Outcome`].
    async fn classify(&self, candidate: &Candidate) -> Outcome;
}

/// Map an HTTP status to an outcome.
///
/// Not-found means the identifier is free, OK means it exists, forbidden and
/// too-many-requests mean the remote is pushing back.
#[must_use]
pub fn outcome_for_status(status: StatusCode) -> Outcome {
    match status {
        StatusCode::NOT_FOUND => Outcome::Available,
        StatusCode::OK => Outcome::Taken,
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => Outcome::Blocked,
        _ => Outcome::Unknown,
    }
}

/// Substitute the candidate into a URL template.
#[must_use]
pub fn build_probe_url(template: &str, candidate: &Candidate) -> String {
    template.replace(CANDIDATE_PLACEHOLDER, candidate.as_str())
}

/// Probe client issuing one GET per candidate.
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: Client,
    url_template: String,
    identities: IdentityPool,
}

impl HttpProber {
    /// Create a prober from the `[probe]` configuration section.
    ///
    /// # Errors
    /// Returns error if the template lacks the placeholder, the user agent
    /// list is empty, or the HTTP client cannot be created.
    pub fn new(config: &ProbeConfig) -> Result<Self> {
        if !config.url_template.contains(CANDIDATE_PLACEHOLDER) {
            return Err(ProbeError::InvalidTemplate(config.url_template.clone()));
        }

        let identities =
            IdentityPool::new(config.user_agents.clone()).ok_or(ProbeError::NoIdentities)?;

        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            client,
            url_template: config.url_template.clone(),
            identities,
        })
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn classify(&self, candidate: &Candidate) -> Outcome {
        let url = build_probe_url(&self.url_template, candidate);
        let user_agent = self.identities.pick().to_string();

        match self
            .client
            .get(&url)
            .header(USER_AGENT, user_agent)
            .send()
            .await
        {
            Ok(response) => {
                let status = response.status();
                tracing::trace!("{} answered {} for {}", url, status, candidate);
                outcome_for_status(status)
            }
            Err(e) => {
                tracing::debug!("Probe for {} failed: {}", candidate, e);
                Outcome::Error
            }
        }
    }
}
