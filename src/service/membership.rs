//! Adding users to guilds with their OAuth token.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::json;

use crate::model::membership::MembershipOutcome;

/// Issues the platform call that joins a user to a guild.
#[async_trait]
pub trait MembershipOperator: Send + Sync {
    /// Makes a single attempt; retrying is left to the caller.
    async fn add_member(&self, guild_id: u64, user_id: u64, access_token: &str) -> MembershipOutcome;
}

/// Membership operator over Discord's `PUT /guilds/{guild}/members/{user}` endpoint.
///
/// Authenticated as the bot; the user's `guilds.join` access token in the body is the
/// proof of consent.
pub struct DiscordMembershipOperator {
    http_client: reqwest::Client,
    api_base: String,
    bot_token: String,
}

impl DiscordMembershipOperator {
    pub fn new(
        http_client: reqwest::Client,
        api_base: impl Into<String>,
        bot_token: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            bot_token: bot_token.into(),
        }
    }
}

#[async_trait]
impl MembershipOperator for DiscordMembershipOperator {
    async fn add_member(&self, guild_id: u64, user_id: u64, access_token: &str) -> MembershipOutcome {
        let url = format!("{}/guilds/{}/members/{}", self.api_base, guild_id, user_id);

        let response = match self
            .http_client
            .put(url)
            .header("Authorization", format!("Bot {}", self.bot_token))
            .json(&json!({ "access_token": access_token }))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Membership request for {} in {} failed: {}", user_id, guild_id, e);
                return MembershipOutcome::Failed(e.to_string());
            }
        };

        match response.status() {
            StatusCode::CREATED => MembershipOutcome::Added,
            StatusCode::NO_CONTENT => MembershipOutcome::AlreadyMember,
            status => {
                let body = response.text().await.unwrap_or_default();
                tracing::debug!(
                    "Discord rejected adding {} to {}: {} {}",
                    user_id,
                    guild_id,
                    status,
                    body
                );
                MembershipOutcome::Rejected {
                    status: status.as_u16(),
                    body,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn operator(server: &mockito::Server) -> DiscordMembershipOperator {
        DiscordMembershipOperator::new(reqwest::Client::new(), server.url(), "bot-token")
    }

    #[tokio::test]
    async fn created_means_added() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/guilds/10/members/20")
            .match_header("Authorization", "Bot bot-token")
            .match_body(Matcher::Json(json!({ "access_token": "user-token" })))
            .with_status(201)
            .with_body("{}")
            .create_async()
            .await;

        let outcome = operator(&server).add_member(10, 20, "user-token").await;

        assert_eq!(outcome, MembershipOutcome::Added);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn no_content_means_already_member() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("PUT", "/guilds/10/members/20")
            .with_status(204)
            .create_async()
            .await;

        let outcome = operator(&server).add_member(10, 20, "user-token").await;

        assert_eq!(outcome, MembershipOutcome::AlreadyMember);
        assert!(outcome.is_success());
        assert_ne!(outcome.message(), MembershipOutcome::Added.message());
    }

    #[tokio::test]
    async fn other_status_is_rejected_with_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("PUT", "/guilds/10/members/20")
            .with_status(403)
            .with_body(r#"{"message": "Missing Permissions", "code": 50013}"#)
            .create_async()
            .await;

        let outcome = operator(&server).add_member(10, 20, "user-token").await;

        match outcome {
            MembershipOutcome::Rejected { status, body } => {
                assert_eq!(status, 403);
                assert!(body.contains("Missing Permissions"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn unreachable_api_fails() {
        let operator = DiscordMembershipOperator::new(
            reqwest::Client::new(),
            "http://127.0.0.1:1",
            "bot-token",
        );

        let outcome = operator.add_member(10, 20, "user-token").await;

        assert!(matches!(outcome, MembershipOutcome::Failed(_)));
    }
}
