//! Thin JSON client for the test server.

use reqwest::StatusCode;
use serde_json::{Value, json};

pub struct TestClient {
    base_url: String,
    client: reqwest::Client,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    pub async fn health(&self) -> anyhow::Result<Value> {
        let res = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        Ok(res.json().await?)
    }

    pub async fn post(&self, path: &str, body: Value) -> anyhow::Result<(Value, StatusCode)> {
        let res = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(&body)
            .send()
            .await?;
        let status = res.status();
        Ok((res.json().await?, status))
    }

    pub async fn score(
        &self,
        card_id: &str,
        expected: &str,
        answer: &str,
        keypoints: &[&str],
    ) -> anyhow::Result<(Value, StatusCode)> {
        self.post(
            "/score",
            json!({
                "cardId": card_id,
                "prompt": "",
                "expectedAnswer": expected,
                "userAnswer": answer,
                "keypoints": keypoints,
            }),
        )
        .await
    }

    pub async fn rate(&self, card_id: &str, quality: i64) -> anyhow::Result<(Value, StatusCode)> {
        self.post("/rate", json!({ "cardId": card_id, "quality": quality }))
            .await
    }

    pub async fn warm_model(&self) -> anyhow::Result<(Value, StatusCode)> {
        self.post("/warm-model", json!({})).await
    }
}
