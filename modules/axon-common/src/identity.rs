use uuid::Uuid;

/// Read-only identity context computed once per process.
///
/// The runtime treats this as opaque context for logging and error
/// reports, not state it owns. Persistence across processes (the original
/// stores the visitor id in browser storage) is the embedder's concern.
#[derive(Debug, Clone)]
pub struct Identity {
    pub visitor_id: String,
    pub session_id: String,
    pub request_url: String,
}

impl Identity {
    /// Mint a fresh identity for this process.
    pub fn generate(request_url: impl Into<String>) -> Self {
        Self {
            visitor_id: Uuid::new_v4().to_string(),
            session_id: Uuid::new_v4().to_string(),
            request_url: request_url.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_distinct() {
        let a = Identity::generate("https://example.test/");
        let b = Identity::generate("https://example.test/");
        assert_ne!(a.visitor_id, b.visitor_id);
        assert_ne!(a.session_id, b.session_id);
        assert_ne!(a.visitor_id, a.session_id);
    }
}
