use reqwest::StatusCode;

/// Failure while fetching weather from an external source.
///
/// Never cached and never retried; the caller decides what to show.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("{provider}: request failed: {source}")]
    Network {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider}: request failed with status {status}: {body}")]
    Status {
        provider: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("{provider}: failed to parse response: {source}")]
    Parse {
        provider: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The source answered but reported an error in its payload.
    #[error("{provider}: {message}")]
    Api {
        provider: &'static str,
        message: String,
    },
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
