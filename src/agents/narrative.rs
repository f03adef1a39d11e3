//! Narrative analysis agent.
//!
//! Sends a bounded, pre-trimmed summary of a fixture or player to the chat
//! backend and returns free text. Failures never propagate: they become a
//! [`Narrative::Unavailable`] carrying a user-visible message.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use super::backend::{AiBackend, ChatMessage, ChatRequest, OpenAiBackend};
use super::AgentError;
use crate::config::AiConfig;
use crate::models::{Fixture, MatchStatistics, PlayerStatistics, Prediction, StatLine};

/// Fixed system role for every analysis request.
pub const SYSTEM_ROLE: &str =
    "You are a football analytics expert providing detailed analysis and insights.";

/// Statistics entries included per player.
const MAX_PLAYER_ENTRIES: usize = 5;

/// What a narrative is about; selects the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NarrativeSubject {
    Fixture,
    Player,
}

impl NarrativeSubject {
    fn prompt(self, payload: &str) -> String {
        match self {
            NarrativeSubject::Fixture => format!(
                "Analyze this football match data and provide insights: {}. Include:\n\
                 1. Match prediction\n\
                 2. Key factors affecting the outcome\n\
                 3. Team form analysis\n\
                 4. Key player matchups\n\
                 5. Historical context",
                payload
            ),
            NarrativeSubject::Player => format!(
                "Analyze this football player's statistics and provide insights: {}. Include:\n\
                 1. Performance overview\n\
                 2. Key strengths\n\
                 3. Areas for improvement\n\
                 4. Comparison to similar players\n\
                 5. Future predictions",
                payload
            ),
        }
    }
}

/// Result of a narrative request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Narrative {
    Ready { text: String, model: String },
    Unavailable { message: String },
}

impl Narrative {
    pub fn text(&self) -> Option<&str> {
        match self {
            Narrative::Ready { text, .. } => Some(text),
            Narrative::Unavailable { .. } => None,
        }
    }
}

/// Fixture fields sent for analysis.
#[derive(Debug, Clone, Serialize)]
pub struct FixtureBrief {
    pub league: String,
    pub round: Option<String>,
    pub date: Option<String>,
    pub venue: Option<String>,
    pub status: String,
    pub home_team: String,
    pub away_team: String,
    pub score: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub statistics: Vec<StatLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predicted_winner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advice: Option<String>,
}

impl FixtureBrief {
    pub fn new(
        fixture: &Fixture,
        statistics: Option<&MatchStatistics>,
        prediction: Option<&Prediction>,
    ) -> Self {
        Self {
            league: fixture.league.name.clone(),
            round: fixture.league.round.clone(),
            date: fixture.date.map(|d| d.to_rfc3339()),
            venue: fixture.venue.clone(),
            status: fixture.status.long.clone(),
            home_team: fixture.home_team.name.clone(),
            away_team: fixture.away_team.name.clone(),
            score: match (fixture.home_goals, fixture.away_goals) {
                (Some(h), Some(a)) => Some(format!("{}-{}", h, a)),
                _ => None,
            },
            statistics: statistics.map(|s| s.lines.clone()).unwrap_or_default(),
            predicted_winner: prediction.map(|p| p.winner.clone()),
            advice: prediction.map(|p| p.advice.clone()),
        }
    }
}

/// One competition line of a player brief.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerBriefEntry {
    pub team: String,
    pub league: String,
    pub season: Option<i32>,
    pub position: String,
    pub appearances: u32,
    pub minutes: u32,
    pub rating: Option<String>,
    pub goals: u32,
    pub assists: u32,
    pub yellow_cards: u32,
    pub red_cards: u32,
}

/// Player fields sent for analysis.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerBrief {
    pub name: String,
    pub age: Option<u32>,
    pub nationality: Option<String>,
    pub statistics: Vec<PlayerBriefEntry>,
}

impl PlayerBrief {
    pub fn new(stats: &PlayerStatistics) -> Self {
        Self {
            name: stats.player.name.clone(),
            age: stats.player.age,
            nationality: stats.player.nationality.clone(),
            statistics: stats
                .entries
                .iter()
                .take(MAX_PLAYER_ENTRIES)
                .map(|e| PlayerBriefEntry {
                    team: e.team.name.clone(),
                    league: e.league_name.clone(),
                    season: e.season,
                    position: e.games.position.clone(),
                    appearances: e.games.appearances,
                    minutes: e.games.minutes,
                    rating: e.games.rating.clone(),
                    goals: e.goals.total,
                    assists: e.goals.assists,
                    yellow_cards: e.cards.yellow,
                    red_cards: e.cards.red,
                })
                .collect(),
        }
    }
}

/// Produces narratives; disabled when no backend could be configured.
#[derive(Clone)]
pub struct NarrativeAgent {
    backend: Result<Arc<dyn AiBackend>, String>,
    temperature: f32,
    max_tokens: u32,
}

impl std::fmt::Debug for NarrativeAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NarrativeAgent")
            .field("backend", &self.backend.as_ref().map(|b| b.name()))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl NarrativeAgent {
    /// Build from config. A missing key disables the agent instead of
    /// failing.
    pub fn from_config(config: &AiConfig) -> Self {
        let backend = match OpenAiBackend::from_config(config) {
            Ok(backend) => Ok(Arc::new(backend) as Arc<dyn AiBackend>),
            Err(e) => {
                info!("AI narrative disabled: {}", e);
                Err(e.user_message())
            }
        };
        Self {
            backend,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    pub fn with_backend(backend: Arc<dyn AiBackend>, config: &AiConfig) -> Self {
        Self {
            backend: Ok(backend),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    pub fn disabled(message: impl Into<String>) -> Self {
        let config = AiConfig::default();
        Self {
            backend: Err(message.into()),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.backend.is_ok()
    }

    /// The narrative a disabled agent returns, without building a brief.
    pub fn unavailable(&self) -> Option<Narrative> {
        self.backend.as_ref().err().map(|message| Narrative::Unavailable {
            message: message.clone(),
        })
    }

    pub async fn analyze_fixture(&self, brief: &FixtureBrief) -> Narrative {
        self.narrate(NarrativeSubject::Fixture, brief).await
    }

    pub async fn analyze_player(&self, brief: &PlayerBrief) -> Narrative {
        self.narrate(NarrativeSubject::Player, brief).await
    }

    async fn narrate<T: Serialize>(&self, subject: NarrativeSubject, payload: &T) -> Narrative {
        let backend = match &self.backend {
            Ok(backend) => backend,
            Err(message) => {
                return Narrative::Unavailable {
                    message: message.clone(),
                }
            }
        };

        match self.request(backend.as_ref(), subject, payload).await {
            Ok((text, model)) => Narrative::Ready { text, model },
            Err(e) => {
                warn!("{:?} narrative failed via {}: {}", subject, backend.name(), e);
                Narrative::Unavailable {
                    message: e.user_message(),
                }
            }
        }
    }

    async fn request<T: Serialize>(
        &self,
        backend: &dyn AiBackend,
        subject: NarrativeSubject,
        payload: &T,
    ) -> Result<(String, String), AgentError> {
        let payload = serde_json::to_string(payload)?;
        let request = ChatRequest::new(vec![
            ChatMessage::system(SYSTEM_ROLE),
            ChatMessage::user(subject.prompt(&payload)),
        ])
        .with_temperature(self.temperature)
        .with_max_tokens(self.max_tokens);

        let response = backend.chat(request).await?;
        Ok((response.content, response.model))
    }
}
