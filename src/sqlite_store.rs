use std::path::Path;

use rusqlite::{Connection, OpenFlags, OptionalExtension, params};

use crate::error::{EngineError, Result};
use crate::fixtures::FixtureRecord;
use crate::signals::{Difficulty, FixtureContext, PlayerSignal, PlayerStatus};
use crate::source::PlayerSource;

/// Read-only view over the ingested fantasy database.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self { conn })
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// Every fixture of `period`, for callers that resolve many teams at once.
    pub fn fixtures_in_period(&self, period: u32) -> Result<Vec<FixtureRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, event, team_h, team_a, difficulty_home, difficulty_away
             FROM fixtures WHERE event = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![period], |row| {
            Ok(FixtureRecord {
                id: row.get(0)?,
                period: row.get(1)?,
                team_h: row.get(2)?,
                team_a: row.get(3)?,
                difficulty_home: difficulty_or_neutral(row.get(4)?),
                difficulty_away: difficulty_or_neutral(row.get(5)?),
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}

impl PlayerSource for SqliteStore {
    fn get_player(&self, id: u32) -> Result<PlayerSignal> {
        let row = self
            .conn
            .query_row(
                "SELECT id, team_id, status, points_per_game, form,
                        expected_goals, expected_assists, expected_goal_involvements
                 FROM players WHERE id = ?1",
                params![id],
                |row| {
                    let status: Option<String> = row.get(2)?;
                    let xg: Option<f64> = row.get(5)?;
                    let xa: Option<f64> = row.get(6)?;
                    let xgi: Option<f64> = row.get(7)?;
                    Ok(PlayerSignal {
                        id: row.get(0)?,
                        team_id: row.get::<_, Option<u32>>(1)?.unwrap_or(0),
                        status: status
                            .as_deref()
                            .map(PlayerStatus::from_code)
                            .unwrap_or(PlayerStatus::Available),
                        points_per_game: row.get(3)?,
                        form: row.get(4)?,
                        xgi: match (xg, xa) {
                            (Some(g), Some(a)) => Some(g + a),
                            _ => xgi,
                        },
                        history: Vec::new(),
                    })
                },
            )
            .optional()?;
        row.ok_or_else(|| EngineError::player_not_found(id))
    }

    fn get_fixtures(&self, team_id: u32, period: u32) -> Result<FixtureContext> {
        let fixtures = self
            .fixtures_in_period(period)?
            .iter()
            .filter_map(|r| r.for_team(team_id))
            .collect();
        Ok(FixtureContext::from_fixtures(fixtures))
    }

    fn get_recent_history(&self, player_id: u32, last_n: usize) -> Result<Vec<f64>> {
        let mut stmt = self.conn.prepare(
            "SELECT total_points FROM player_history
             WHERE player_id = ?1 AND total_points IS NOT NULL
             ORDER BY gameweek DESC LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![player_id, last_n as i64], |row| row.get::<_, f64>(0))?;
        let mut out = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        out.reverse();
        Ok(out)
    }
}

fn difficulty_or_neutral(raw: Option<i64>) -> Difficulty {
    raw.map(Difficulty::clamped).unwrap_or(Difficulty::NEUTRAL)
}

/// Creates the tables this store reads. Ingestion owns the full schema; this
/// subset is enough for fixtures and tests.
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS players (
            id INTEGER PRIMARY KEY,
            team_id INTEGER,
            status TEXT,
            points_per_game REAL,
            form REAL,
            expected_goals REAL,
            expected_assists REAL,
            expected_goal_involvements REAL
        );
        CREATE TABLE IF NOT EXISTS fixtures (
            id INTEGER PRIMARY KEY,
            event INTEGER,
            team_h INTEGER,
            team_a INTEGER,
            difficulty_home INTEGER,
            difficulty_away INTEGER
        );
        CREATE TABLE IF NOT EXISTS player_history (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            player_id INTEGER,
            gameweek INTEGER,
            total_points INTEGER
        );
        "#,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> SqliteStore {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn.execute_batch(
            r#"
            INSERT INTO players VALUES (430, 13, 'a', 8.1, 9.0, 10.2, 1.3, NULL);
            INSERT INTO players VALUES (16, 1, 'i', 5.0, NULL, NULL, NULL, 2.5);
            INSERT INTO fixtures VALUES (1, 14, 13, 1, 2, 4);
            INSERT INTO fixtures VALUES (2, 14, 7, 13, 3, NULL);
            INSERT INTO player_history (player_id, gameweek, total_points) VALUES
                (430, 10, 2), (430, 11, 13), (430, 12, NULL), (430, 13, 6);
            "#,
        )
        .unwrap();
        SqliteStore::from_connection(conn)
    }

    #[test]
    fn reads_player_signal_from_row() {
        let store = seeded();
        let p = store.get_player(430).unwrap();
        assert_eq!(p.team_id, 13);
        assert_eq!(p.status, PlayerStatus::Available);
        assert!((p.xgi.unwrap() - 11.5).abs() < 1e-9);

        let injured = store.get_player(16).unwrap();
        assert_eq!(injured.status, PlayerStatus::Injured);
        assert_eq!(injured.form, None);
        assert_eq!(injured.xgi, Some(2.5));
    }

    #[test]
    fn unknown_player_is_not_found() {
        assert!(matches!(
            seeded().get_player(1),
            Err(EngineError::NotFound { id: 1, .. })
        ));
    }

    #[test]
    fn double_period_and_null_difficulty() {
        let store = seeded();
        let fx = store.get_fixtures(13, 14).unwrap();
        assert_eq!(fx.len(), 2);
        assert_eq!(fx.fixtures[0].difficulty.value(), 2);
        assert_eq!(fx.fixtures[1].difficulty, Difficulty::NEUTRAL);
        assert!(store.get_fixtures(13, 15).unwrap().is_blank());
    }

    #[test]
    fn history_is_oldest_first_and_skips_nulls() {
        let store = seeded();
        assert_eq!(store.get_recent_history(430, 5).unwrap(), vec![2.0, 13.0, 6.0]);
        assert_eq!(store.get_recent_history(430, 2).unwrap(), vec![13.0, 6.0]);
    }
}
