use reqwest::RequestBuilder;

const PERSON_URN_PREFIX: &str = "urn:li:person:";

/// OAuth bearer token for the member publishing posts.
pub struct LinkedInAuth {
    token: String,
}

impl LinkedInAuth {
    pub fn new(token: String) -> Self {
        Self { token }
    }

    /// Attach the bearer header to a request.
    pub fn apply(&self, req: RequestBuilder) -> RequestBuilder {
        req.bearer_auth(&self.token)
    }
}

/// Accept either a full URN or a bare member id.
pub fn person_urn(id: &str) -> String {
    let id = id.trim();
    if id.starts_with("urn:") {
        id.to_string()
    } else {
        format!("{}{}", PERSON_URN_PREFIX, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_urn() {
        assert_eq!(person_urn("abc123"), "urn:li:person:abc123");
        assert_eq!(person_urn(" urn:li:person:abc123 "), "urn:li:person:abc123");
        assert_eq!(person_urn("urn:li:organization:9"), "urn:li:organization:9");
    }
}
