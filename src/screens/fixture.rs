//! Fixture-level screens: match details, live stats, head-to-head, the
//! rule-based preview and the AI narrative.

use serde::{Serialize, Serializer};
use tracing::{info, warn};

use super::{serialize_section_with, ScreenError, Screens, Section};
use crate::agents::narrative::{FixtureBrief, Narrative};
use crate::models::{
    Fixture, FixtureId, GoalSummary, HeadToHeadRecord, HeadToHeadSummary, LeagueId, MatchEvent,
    MatchPreview, MatchStatistics, Prediction, Squad, TeamId, TeamSeasonStats,
};
use crate::normalize::{self, predictions::PREVIEW_MEETINGS};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SquadPair {
    pub home: Option<Squad>,
    pub away: Option<Squad>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FixtureDetails {
    pub fixture: Fixture,
    pub statistics: Section<MatchStatistics>,
    /// Only requested before full time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prediction: Option<Section<Option<Prediction>>>,
    pub squads: Section<SquadPair>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LiveStats {
    pub fixture: Fixture,
    pub statistics: Section<MatchStatistics>,
    pub events: Section<Vec<MatchEvent>>,
    pub goals: Section<GoalSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HeadToHeadView {
    pub summary: HeadToHeadSummary,
    /// Newest first.
    pub fixtures: Vec<Fixture>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HeadToHeadScreen {
    pub team_a: TeamId,
    pub team_b: TeamId,
    pub record: Section<HeadToHeadView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamStatsPair {
    pub home: Option<TeamSeasonStats>,
    pub away: Option<TeamSeasonStats>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PreviewScreen {
    pub fixture: Fixture,
    pub prediction: Section<Option<Prediction>>,
    #[serde(serialize_with = "serialize_stats_pair")]
    pub team_statistics: Section<TeamStatsPair>,
    pub preview: MatchPreview,
}

#[derive(Serialize)]
struct TeamStatsPairView<'a> {
    home: Option<crate::models::TeamSeasonView<'a>>,
    away: Option<crate::models::TeamSeasonView<'a>>,
}

fn serialize_stats_pair<S: Serializer>(
    pair: &Section<TeamStatsPair>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serialize_section_with(
        pair,
        |p| TeamStatsPairView {
            home: p.home.as_ref().map(TeamSeasonStats::view),
            away: p.away.as_ref().map(TeamSeasonStats::view),
        },
        serializer,
    )
}

impl Screens {
    async fn require_fixture(&self, id: FixtureId) -> Result<Fixture, ScreenError> {
        self.client
            .fixture(id)
            .await?
            .ok_or_else(|| ScreenError::NotFound(format!("Fixture {}", id)))
    }

    /// Match details. Finished matches load half-time split statistics;
    /// matches not yet finished also load the provider prediction.
    pub async fn fixture_details(&self, id: FixtureId) -> Result<FixtureDetails, ScreenError> {
        let fixture = self.require_fixture(id).await?;
        let finished = fixture.status.is_full_time();

        let (statistics, prediction, squads) = tokio::join!(
            self.client.fixture_statistics(id, finished),
            async {
                if finished {
                    None
                } else {
                    Some(self.client.prediction(id).await.map(|(p, _)| p))
                }
            },
            self.client.squads(fixture.home_team.id, fixture.away_team.id),
        );
        info!("Loaded fixture details for {}", id);

        Ok(FixtureDetails {
            statistics: Section::from_result("statistics", statistics),
            prediction: prediction.map(|p| Section::from_result("prediction", p)),
            squads: Section::from_result("squads", squads)
                .map(|(home, away)| SquadPair { home, away }),
            fixture,
        })
    }

    /// Statistics, events and the goal summary of a fixture. Called
    /// repeatedly while a match is in play.
    pub async fn live_stats(&self, id: FixtureId) -> Result<LiveStats, ScreenError> {
        let fixture = self.require_fixture(id).await?;
        let (statistics, events) = tokio::join!(
            self.client.fixture_statistics(id, false),
            self.client.fixture_events(id),
        );
        info!(
            "Loaded live stats for {} ({})",
            id,
            fixture.status.short
        );

        let events = Section::from_result("events", events);
        let home = fixture.home_team.id;
        Ok(LiveStats {
            statistics: Section::from_result("statistics", statistics),
            goals: events
                .as_ref()
                .map(|e| normalize::fixtures::goal_summary(e, home)),
            events,
            fixture,
        })
    }

    /// Fixtures currently in play.
    pub async fn live_fixtures(&self, league: Option<LeagueId>) -> Section<Vec<Fixture>> {
        let fixtures = self.client.live_fixtures(league).await;
        info!("Loaded live fixtures (league: {:?})", league.map(|l| l.get()));
        Section::from_result("live_fixtures", fixtures)
    }

    /// Past meetings between two teams with the win/draw/loss summary.
    pub async fn head_to_head(&self, team_a: TeamId, team_b: TeamId) -> HeadToHeadScreen {
        let record = self.client.head_to_head(team_a, team_b).await;
        info!("Loaded head-to-head {} vs {}", team_a, team_b);
        HeadToHeadScreen {
            team_a,
            team_b,
            record: Section::from_result("head_to_head", record).map(
                |record: HeadToHeadRecord| HeadToHeadView {
                    summary: record.summary(),
                    fixtures: record.fixtures,
                },
            ),
        }
    }

    /// Rule-based preview from the provider prediction and both teams'
    /// season statistics. Missing inputs degrade the wording only.
    pub async fn match_preview(&self, id: FixtureId) -> Result<PreviewScreen, ScreenError> {
        let fixture = self.require_fixture(id).await?;
        let season = self.season(fixture.league.season);

        let (prediction, stats) = tokio::join!(
            self.client.prediction(id),
            self.client.team_statistics_pair(
                fixture.league.id,
                season,
                fixture.home_team.id,
                fixture.away_team.id,
            ),
        );
        info!("Loaded match preview for {}", id);

        let (prediction, meetings) = match prediction {
            Ok((prediction, meetings)) => (Section::ready(prediction), meetings),
            Err(e) => (Section::from_result("prediction", Err(e)), Vec::new()),
        };
        let team_statistics = Section::from_result("team_statistics", stats)
            .map(|(home, away)| TeamStatsPair { home, away });

        let pair = team_statistics.data();
        let preview = normalize::predictions::match_preview(
            &fixture,
            prediction.data().and_then(Option::as_ref),
            pair.and_then(|p| p.home.as_ref()),
            pair.and_then(|p| p.away.as_ref()),
            &meetings[..meetings.len().min(PREVIEW_MEETINGS)],
        );

        Ok(PreviewScreen {
            fixture,
            prediction,
            team_statistics,
            preview,
        })
    }

    /// AI narrative for a fixture. Statistics and prediction are optional
    /// context; their failures are logged and the narrative proceeds
    /// without them.
    pub async fn fixture_narrative(&self, id: FixtureId) -> Result<Narrative, ScreenError> {
        if let Some(unavailable) = self.narrative.unavailable() {
            return Ok(unavailable);
        }
        let fixture = self.require_fixture(id).await?;

        let (statistics, prediction) = tokio::join!(
            self.client.fixture_statistics(id, false),
            self.client.prediction(id),
        );
        let statistics = statistics
            .map_err(|e| warn!("Narrative context: statistics unavailable: {}", e))
            .ok();
        let prediction = prediction
            .map_err(|e| warn!("Narrative context: prediction unavailable: {}", e))
            .ok()
            .and_then(|(p, _)| p);

        let brief = FixtureBrief::new(&fixture, statistics.as_ref(), prediction.as_ref());
        let narrative = self.narrative.analyze_fixture(&brief).await;
        info!("Fixture narrative for {}: {:?}", id, narrative.text().is_some());
        Ok(narrative)
    }
}
