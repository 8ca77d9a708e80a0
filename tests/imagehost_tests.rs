use rental_portal::imagehost::{ImageHost, ImageKitClient, MockImageHost};

#[cfg(test)]
mod mock_tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_delete_known_file() {
        let mock = MockImageHost::new();
        let result = mock.delete_file("file_known").await;
        assert_eq!(result, Ok(true));
    }

    #[tokio::test]
    async fn test_mock_delete_unknown_file() {
        let mock = MockImageHost::new();
        let result = mock.delete_file("file_missing").await;
        assert_eq!(result, Ok(false));
    }

    #[tokio::test]
    async fn test_mock_failure() {
        let mock = MockImageHost::new_failing();
        let result = mock.delete_file("file_known").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_mock_auth_params_shape() {
        let mock = MockImageHost::new();
        let params = mock.auth_params();

        assert!(!params.token.is_empty());
        assert!(params.expire > chrono::Utc::now().timestamp());
        // Hex-encoded HMAC-SHA256 digest.
        assert_eq!(params.signature.len(), 64);
        assert!(params.signature.chars().all(|c| c.is_ascii_hexdigit()));
    }
}

#[cfg(test)]
mod client_tests {
    use super::*;

    fn client() -> ImageKitClient {
        ImageKitClient::new(
            "public_test_key",
            "private_test_key",
            "https://ik.imagekit.io/test",
            "https://api.imagekit.io",
        )
    }

    #[test]
    fn test_signature_is_deterministic() {
        let c = client();
        let a = c.sign("token-1", 1_900_000_000);
        let b = c.sign("token-1", 1_900_000_000);
        assert_eq!(a, b);
    }

    #[test]
    fn test_signature_binds_token_and_expiry() {
        let c = client();
        let base = c.sign("token-1", 1_900_000_000);
        assert_ne!(base, c.sign("token-2", 1_900_000_000));
        assert_ne!(base, c.sign("token-1", 1_900_000_001));
    }

    #[test]
    fn test_signature_depends_on_the_private_key() {
        let other = ImageKitClient::new(
            "public_test_key",
            "another_private_key",
            "https://ik.imagekit.io/test",
            "https://api.imagekit.io",
        );
        assert_ne!(client().sign("token-1", 1_900_000_000), other.sign("token-1", 1_900_000_000));
    }

    #[test]
    fn test_auth_params_verify_against_sign() {
        let c = client();
        let params = c.auth_params();

        // The host recomputes exactly this HMAC to authorize the upload.
        assert_eq!(params.signature, c.sign(&params.token, params.expire));
        assert!(params.expire > chrono::Utc::now().timestamp());
    }

    #[test]
    fn test_client_exposes_browser_facing_config() {
        let c = client();
        assert_eq!(c.public_key(), "public_test_key");
        assert_eq!(c.url_endpoint(), "https://ik.imagekit.io/test");
    }
}
