//! Head-to-head history between two teams.

use serde::Serialize;

use super::{Fixture, Outcome, StatusCode, TeamId};

/// Past meetings between exactly two teams.
///
/// Every meeting between the two teams is kept for listing. Only finished
/// meetings are tallied, so each counted meeting is exactly one of a win
/// for either side or a draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadToHeadRecord {
    pub team_a: TeamId,
    pub team_b: TeamId,
    pub fixtures: Vec<Fixture>,
}

/// Aggregates over a head-to-head record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HeadToHeadSummary {
    pub team_a_wins: u32,
    pub team_b_wins: u32,
    pub draws: u32,
    pub team_a_goals: u32,
    pub team_b_goals: u32,
    pub total_matches: u32,
}

impl HeadToHeadRecord {
    pub fn new(team_a: TeamId, team_b: TeamId, fixtures: Vec<Fixture>) -> Self {
        let fixtures = fixtures
            .into_iter()
            .filter(|f| {
                let ids = (f.home_team.id, f.away_team.id);
                ids == (team_a, team_b) || ids == (team_b, team_a)
            })
            .collect();
        Self {
            team_a,
            team_b,
            fixtures,
        }
    }

    /// Meetings with a final result (FT, AET or PEN).
    pub fn finished(&self) -> impl Iterator<Item = &Fixture> {
        self.fixtures
            .iter()
            .filter(|f| f.status.code == StatusCode::Finished && f.outcome().is_some())
    }

    /// Win/draw/loss counts and goals over finished meetings, in one pass.
    pub fn summary(&self) -> HeadToHeadSummary {
        let mut s = HeadToHeadSummary::default();
        for f in self.finished() {
            let winner = match f.outcome() {
                Some(Outcome::HomeWin) => Some(f.home_team.id),
                Some(Outcome::AwayWin) => Some(f.away_team.id),
                Some(Outcome::Draw) | None => None,
            };
            match winner {
                Some(id) if id == self.team_a => s.team_a_wins += 1,
                Some(_) => s.team_b_wins += 1,
                None => s.draws += 1,
            }
            s.team_a_goals += f.goals_for(self.team_a);
            s.team_b_goals += f.goals_for(self.team_b);
            s.total_matches += 1;
        }
        s
    }

    /// Most recent `n` meetings (the provider lists newest first).
    pub fn latest(&self, n: usize) -> &[Fixture] {
        &self.fixtures[..n.min(self.fixtures.len())]
    }
}
