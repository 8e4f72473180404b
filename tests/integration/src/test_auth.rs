//! Session cookie authentication integration tests.

#[cfg(test)]
mod tests {
    use reqwest::header::{COOKIE, WWW_AUTHENTICATE};
    use serde_json::json;

    use crate::{
        cleanup_session, cookie_name, create_session, endpoint_url, http_client, put_session,
        session_cookie, test_session_id,
    };

    async fn auth_request(cookie: Option<&str>) -> reqwest::Response {
        let mut req = http_client().get(format!("{}/auth", endpoint_url()));
        if let Some(cookie) = cookie {
            req = req.header(COOKIE, cookie);
        }
        req.send().await.unwrap()
    }

    async fn assert_unauthorized(resp: reqwest::Response) {
        assert_eq!(resp.status(), 401);
        assert_eq!(resp.headers().get(WWW_AUTHENTICATE).unwrap(), "Cookie");
        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body["statusCode"], 401);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_accept_valid_session() {
        let record = json!({"user": {"id": 7, "name": "alice"}, "cookie": {"path": "/"}});
        let id = create_session("valid", &record).await;

        let resp = auth_request(Some(&session_cookie(&id))).await;

        assert_eq!(resp.status(), 200);
        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body, record);

        cleanup_session(&id).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_find_cookie_among_others() {
        let id = create_session("multi", &json!({"user": "bob"})).await;
        let header = format!("theme=dark; {}; lang=en", session_cookie(&id));

        let resp = auth_request(Some(&header)).await;
        assert_eq!(resp.status(), 200);

        cleanup_session(&id).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_missing_cookie() {
        assert_unauthorized(auth_request(None).await).await;
        assert_unauthorized(auth_request(Some("theme=dark")).await).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_unprefixed_cookie() {
        let id = create_session("unprefixed", &json!({"user": "carol"})).await;
        let cookie = format!("{}={id}", cookie_name());

        assert_unauthorized(auth_request(Some(&cookie)).await).await;

        cleanup_session(&id).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_forged_signature() {
        let id = create_session("forged", &json!({"user": "dave"})).await;
        let cookie = format!("{}=s%3A{id}.AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA", cookie_name());

        assert_unauthorized(auth_request(Some(&cookie)).await).await;

        cleanup_session(&id).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_unknown_session() {
        let id = test_session_id("unknown");
        assert_unauthorized(auth_request(Some(&session_cookie(&id))).await).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_session_without_user() {
        for record in [json!({"cookie": {}}), json!({"user": null}), json!({"user": ""})] {
            let id = create_session("anon", &record).await;

            assert_unauthorized(auth_request(Some(&session_cookie(&id))).await).await;

            cleanup_session(&id).await;
        }
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_corrupt_session_data() {
        let id = test_session_id("corrupt");
        put_session(&id, "{not json").await;

        assert_unauthorized(auth_request(Some(&session_cookie(&id))).await).await;

        cleanup_session(&id).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_see_session_deletion() {
        let id = create_session("logout", &json!({"user": "erin"})).await;
        let cookie = session_cookie(&id);

        assert_eq!(auth_request(Some(&cookie)).await.status(), 200);
        cleanup_session(&id).await;
        assert_unauthorized(auth_request(Some(&cookie)).await).await;
    }
}
