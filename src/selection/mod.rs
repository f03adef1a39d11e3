//! Filter chain used by the player and team screens.
//!
//! Country → League → Team → Player, plus a chain-wide season. Each level
//! gates the option list of the next one: choosing a country asks for its
//! leagues, a league for its teams, a team for its squad. Changing a level
//! clears everything below it.
//!
//! Option lists arrive asynchronously. Every [`FetchRequest`] carries a
//! [`Ticket`] naming the level whose options it fills and that level's
//! generation at the time it was issued. Invalidating a level bumps its
//! generation, so a late response for an older choice is rejected by
//! [`SelectionState::apply`] instead of overwriting newer options.

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::fetch::{FetchError, SportsClient};
use crate::models::{Country, League, LeagueId, PlayerId, SquadPlayer, Team, TeamId};
use crate::normalize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Country,
    League,
    Team,
    Player,
}

impl Level {
    fn index(self) -> usize {
        match self {
            Level::Country => 0,
            Level::League => 1,
            Level::Team => 2,
            Level::Player => 3,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Stale {level:?} options (generation {issued}, current {current})")]
    Stale {
        level: Level,
        issued: u64,
        current: u64,
    },

    #[error("Options for {expected:?} cannot fill the {actual:?} level")]
    LevelMismatch { expected: Level, actual: Level },
}

/// Identifies which option list a fetch fills and when it was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Ticket {
    pub level: Level,
    pub generation: u64,
}

/// What to fetch for an option list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FetchTarget {
    Countries,
    Leagues { country: String },
    Teams { league: LeagueId, season: i32 },
    Players { team: TeamId },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchRequest {
    pub ticket: Ticket,
    pub target: FetchTarget,
}

/// A resolved option list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "options", rename_all = "lowercase")]
pub enum Options {
    Countries(Vec<Country>),
    Leagues(Vec<League>),
    Teams(Vec<Team>),
    Players(Vec<SquadPlayer>),
}

impl Options {
    pub fn level(&self) -> Level {
        match self {
            Options::Countries(_) => Level::Country,
            Options::Leagues(_) => Level::League,
            Options::Teams(_) => Level::Team,
            Options::Players(_) => Level::Player,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Options::Countries(o) => o.len(),
            Options::Leagues(o) => o.len(),
            Options::Teams(o) => o.len(),
            Options::Players(o) => o.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SelectionState {
    season: i32,
    country: Option<String>,
    league: Option<LeagueId>,
    team: Option<TeamId>,
    player: Option<PlayerId>,
    countries: Vec<Country>,
    leagues: Vec<League>,
    teams: Vec<Team>,
    players: Vec<SquadPlayer>,
    #[serde(skip)]
    generations: [u64; 4],
}

impl SelectionState {
    pub fn new(season: i32) -> Self {
        Self {
            season,
            country: None,
            league: None,
            team: None,
            player: None,
            countries: Vec::new(),
            leagues: Vec::new(),
            teams: Vec::new(),
            players: Vec::new(),
            generations: [0; 4],
        }
    }

    pub fn season(&self) -> i32 {
        self.season
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    pub fn league(&self) -> Option<LeagueId> {
        self.league
    }

    pub fn team(&self) -> Option<TeamId> {
        self.team
    }

    pub fn player(&self) -> Option<PlayerId> {
        self.player
    }

    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    pub fn leagues(&self) -> &[League] {
        &self.leagues
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn players(&self) -> &[SquadPlayer] {
        &self.players
    }

    /// Request for the country list that starts the chain.
    pub fn load_countries(&mut self) -> FetchRequest {
        self.countries.clear();
        FetchRequest {
            ticket: self.invalidate(Level::Country),
            target: FetchTarget::Countries,
        }
    }

    /// Choose a country. Clears league, team and player along with their
    /// option lists.
    pub fn set_country(&mut self, country: Option<String>) -> Option<FetchRequest> {
        self.country = country.filter(|c| !c.trim().is_empty());
        self.clear_below(Level::Country);
        let country = self.country.clone()?;
        Some(FetchRequest {
            ticket: self.ticket(Level::League),
            target: FetchTarget::Leagues { country },
        })
    }

    /// Choose a league. Clears team and player.
    pub fn set_league(&mut self, league: Option<LeagueId>) -> Option<FetchRequest> {
        self.league = league;
        self.clear_below(Level::League);
        self.teams_request()
    }

    /// Choose a team. Clears player.
    pub fn set_team(&mut self, team: Option<TeamId>) -> Option<FetchRequest> {
        self.team = team;
        self.clear_below(Level::Team);
        let team = self.team?;
        Some(FetchRequest {
            ticket: self.ticket(Level::Player),
            target: FetchTarget::Players { team },
        })
    }

    /// Choose a player. The last level; nothing further to fetch.
    pub fn set_player(&mut self, player: Option<PlayerId>) {
        self.player = player;
    }

    /// Change the season. Team and player depend on it, so both are
    /// cleared and the team list is requested again.
    pub fn set_season(&mut self, season: i32) -> Option<FetchRequest> {
        if season == self.season {
            return None;
        }
        self.season = season;
        self.clear_below(Level::League);
        self.teams_request()
    }

    /// Empty the whole chain, including the country list. Outstanding
    /// requests of every level become stale.
    pub fn reset(&mut self) {
        debug!("Resetting selection chain");
        self.country = None;
        self.countries.clear();
        self.invalidate(Level::Country);
        self.clear_below(Level::Country);
    }

    /// Accept a resolved option list if its ticket is still current.
    pub fn apply(&mut self, ticket: Ticket, options: Options) -> Result<(), SelectionError> {
        if options.level() != ticket.level {
            return Err(SelectionError::LevelMismatch {
                expected: ticket.level,
                actual: options.level(),
            });
        }
        let current = self.generations[ticket.level.index()];
        if ticket.generation != current {
            debug!(
                "Discarding stale {:?} options (generation {} != {})",
                ticket.level, ticket.generation, current
            );
            return Err(SelectionError::Stale {
                level: ticket.level,
                issued: ticket.generation,
                current,
            });
        }

        match options {
            Options::Countries(o) => self.countries = o,
            Options::Leagues(o) => self.leagues = o,
            Options::Teams(o) => self.teams = o,
            Options::Players(o) => self.players = o,
        }
        Ok(())
    }

    fn teams_request(&mut self) -> Option<FetchRequest> {
        let league = self.league?;
        Some(FetchRequest {
            ticket: self.ticket(Level::Team),
            target: FetchTarget::Teams {
                league,
                season: self.season,
            },
        })
    }

    fn ticket(&self, level: Level) -> Ticket {
        Ticket {
            level,
            generation: self.generations[level.index()],
        }
    }

    /// Bump a level's generation and return a ticket for the new one.
    fn invalidate(&mut self, level: Level) -> Ticket {
        self.generations[level.index()] += 1;
        self.ticket(level)
    }

    /// Clear every level below `level` and its option list.
    fn clear_below(&mut self, level: Level) {
        let start = level.index() + 1;
        for idx in start..4 {
            self.generations[idx] += 1;
            match idx {
                1 => {
                    self.league = None;
                    self.leagues.clear();
                }
                2 => {
                    self.team = None;
                    self.teams.clear();
                }
                _ => {
                    self.player = None;
                    self.players.clear();
                }
            }
        }
    }
}

/// Perform the fetch a [`FetchRequest`] describes.
pub async fn resolve(client: &SportsClient, request: &FetchRequest) -> Result<Options, FetchError> {
    debug!("Resolving {:?} options", request.ticket.level);
    Ok(match &request.target {
        FetchTarget::Countries => {
            let leagues = client.leagues(None).await?;
            Options::Countries(
                normalize::leagues::group_by_country(leagues)
                    .into_iter()
                    .map(|group| group.country)
                    .collect(),
            )
        }
        FetchTarget::Leagues { country } => {
            Options::Leagues(client.leagues_in_country(country).await?)
        }
        FetchTarget::Teams { league, season } => {
            Options::Teams(client.teams(*league, *season).await?)
        }
        FetchTarget::Players { team } => Options::Players(
            client
                .squad(*team)
                .await?
                .map(|squad| squad.players)
                .unwrap_or_default(),
        ),
    })
}

/// Issue `request`, then apply the result to `state` if it is still wanted.
pub async fn fetch_and_apply(
    client: &SportsClient,
    state: &mut SelectionState,
    request: FetchRequest,
) -> Result<bool, FetchError> {
    let options = resolve(client, &request).await?;
    Ok(state.apply(request.ticket, options).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn league(id: u32) -> League {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": format!("League {}", id),
            "kind": "League",
            "country": {"name": "England", "code": "GB", "flag": null},
            "logo_url": null,
            "seasons": []
        }))
        .unwrap()
    }

    fn chain_with_team() -> SelectionState {
        let mut state = SelectionState::new(2024);
        let req = state.set_country(Some("England".into())).unwrap();
        state
            .apply(req.ticket, Options::Leagues(vec![league(39)]))
            .unwrap();
        let req = state.set_league(Some(LeagueId::new(39))).unwrap();
        state
            .apply(req.ticket, Options::Teams(vec![Team::new(TeamId::new(33), "Man United")]))
            .unwrap();
        state.set_team(Some(TeamId::new(33)));
        state
    }

    #[test]
    fn test_country_change_clears_lower_levels() {
        let mut state = chain_with_team();
        assert_eq!(state.leagues().len(), 1);
        assert_eq!(state.teams().len(), 1);

        let req = state.set_country(Some("Spain".into())).unwrap();
        assert_eq!(
            req.target,
            FetchTarget::Leagues {
                country: "Spain".into()
            }
        );
        assert_eq!(state.league(), None);
        assert_eq!(state.team(), None);
        assert!(state.leagues().is_empty());
        assert!(state.teams().is_empty());
        assert!(state.players().is_empty());
    }

    #[test]
    fn test_requests_follow_the_chain() {
        let mut state = SelectionState::new(2023);
        assert!(state.set_league(None).is_none());

        let req = state.set_league(Some(LeagueId::new(140))).unwrap();
        assert_eq!(req.ticket.level, Level::Team);
        assert_eq!(
            req.target,
            FetchTarget::Teams {
                league: LeagueId::new(140),
                season: 2023
            }
        );

        let req = state.set_team(Some(TeamId::new(529))).unwrap();
        assert_eq!(req.target, FetchTarget::Players { team: TeamId::new(529) });

        state.set_player(Some(PlayerId::new(154)));
        assert_eq!(state.player(), Some(PlayerId::new(154)));
    }

    #[test]
    fn test_stale_ticket_rejected() {
        let mut state = SelectionState::new(2024);
        let first = state.set_country(Some("England".into())).unwrap();
        let second = state.set_country(Some("Spain".into())).unwrap();

        let err = state
            .apply(first.ticket, Options::Leagues(vec![league(39)]))
            .unwrap_err();
        assert!(matches!(err, SelectionError::Stale { level: Level::League, .. }));
        assert!(state.leagues().is_empty());

        state
            .apply(second.ticket, Options::Leagues(vec![league(140)]))
            .unwrap();
        assert_eq!(state.leagues()[0].id, LeagueId::new(140));
    }

    #[test]
    fn test_mismatched_options_rejected() {
        let mut state = SelectionState::new(2024);
        let req = state.set_country(Some("England".into())).unwrap();
        let err = state.apply(req.ticket, Options::Teams(vec![])).unwrap_err();
        assert_eq!(
            err,
            SelectionError::LevelMismatch {
                expected: Level::League,
                actual: Level::Team
            }
        );
    }

    #[test]
    fn test_season_change_refetches_teams() {
        let mut state = chain_with_team();
        assert!(state.set_season(2024).is_none());

        let req = state.set_season(2022).unwrap();
        assert_eq!(state.season(), 2022);
        assert_eq!(state.league(), Some(LeagueId::new(39)));
        assert_eq!(state.team(), None);
        assert!(state.teams().is_empty());
        assert_eq!(
            req.target,
            FetchTarget::Teams {
                league: LeagueId::new(39),
                season: 2022
            }
        );
    }

    #[test]
    fn test_reset_empties_chain() {
        let mut state = chain_with_team();
        let countries = state.load_countries();
        state.reset();

        assert_eq!(state.country(), None);
        assert_eq!(state.league(), None);
        assert!(state.leagues().is_empty());
        assert!(state.apply(countries.ticket, Options::Countries(vec![])).is_err());
    }

    #[tokio::test]
    async fn test_fetch_and_apply_fills_players() {
        use crate::fetch::ClientConfig;

        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/players/squads")
            .match_query(mockito::Matcher::UrlEncoded("team".into(), "33".into()))
            .with_status(200)
            .with_body(
                r#"{"errors":[],"response":[{"team":{"id":33,"name":"Man United"},
                   "players":[{"id":882,"name":"D. de Gea","number":1,"position":"Goalkeeper"}]}]}"#,
            )
            .create_async()
            .await;

        let client = SportsClient::new(ClientConfig {
            base_url: server.url(),
            api_key: Some("key".into()),
            ..ClientConfig::default()
        })
        .unwrap();

        let mut state = SelectionState::new(2024);
        let req = state.set_team(Some(TeamId::new(33))).unwrap();
        assert!(fetch_and_apply(&client, &mut state, req).await.unwrap());
        assert_eq!(state.players().len(), 1);
        assert_eq!(state.players()[0].name, "D. de Gea");
    }
}
