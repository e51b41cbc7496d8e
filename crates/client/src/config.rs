//! Client configuration loaded from the process environment.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use animation_sequencer::TokioHost;
use game_core::MovementMode;
use runtime::TurnConfig;

/// Repaint clock settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostConfig {
    pub frame_interval: Duration,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            frame_interval: TokioHost::DEFAULT_FRAME_INTERVAL,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub host: HostConfig,
    pub turn: TurnConfig,
    /// Scripted player actions to play before exiting.
    pub demo_turns: u32,
    /// Also write logs to `<dir>/dungeon.log` when set.
    pub log_dir: Option<PathBuf>,
}

impl ClientConfig {
    pub const DEFAULT_DEMO_TURNS: u32 = 8;

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `TURN_MOVE_PACING_MS` - Pause after a moving actor (default: 600)
    /// - `TURN_FROZEN_PACING_MS` - Pause after a frozen actor (default: 50)
    /// - `TURN_FINAL_PACING_MS` - Final pause before input reopens (default: 200)
    /// - `TURN_HIT_PACING_MS` - Final pause when the player was struck (default: 700)
    /// - `MOVEMENT_MODE` - `normal` or `constrained` (default: normal)
    /// - `GAME_SEED` - Constrained-mode selection seed (default: random)
    /// - `FRAME_INTERVAL_MS` - Repaint interval (default: 16)
    /// - `DEMO_TURNS` - Number of scripted player actions (default: 8)
    /// - `LOG_DIR` - Directory for the log file (default: stderr only)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read_ms = |key: &str| read::<u64>(&lookup, key).map(Duration::from_millis);

        let mut turn = match read::<u64>(&lookup, "GAME_SEED") {
            Some(seed) => TurnConfig::default().with_seed(seed),
            None => TurnConfig::random_seed(),
        };
        if let Some(pacing) = read_ms("TURN_MOVE_PACING_MS") {
            turn.move_pacing = pacing;
        }
        if let Some(pacing) = read_ms("TURN_FROZEN_PACING_MS") {
            turn.frozen_pacing = pacing;
        }
        if let Some(pacing) = read_ms("TURN_FINAL_PACING_MS") {
            turn.final_pacing = pacing;
        }
        if let Some(pacing) = read_ms("TURN_HIT_PACING_MS") {
            turn.hit_pacing = pacing;
        }
        if let Some(mode) = read::<MovementMode>(&lookup, "MOVEMENT_MODE") {
            turn = turn.with_movement_mode(mode);
        }

        let mut host = HostConfig::default();
        if let Some(interval) = read_ms("FRAME_INTERVAL_MS") {
            host.frame_interval = interval;
        }

        Self {
            host,
            turn,
            demo_turns: read(&lookup, "DEMO_TURNS").unwrap_or(Self::DEFAULT_DEMO_TURNS),
            log_dir: lookup("LOG_DIR")
                .filter(|dir| !dir.is_empty())
                .map(PathBuf::from),
        }
    }
}

fn read<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: FromStr,
{
    lookup(key)?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> ClientConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        ClientConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = config(&[]);
        assert_eq!(config.turn.move_pacing, TurnConfig::DEFAULT_MOVE_PACING);
        assert_eq!(config.turn.movement_mode(), MovementMode::Normal);
        assert_eq!(config.host, HostConfig::default());
        assert_eq!(config.demo_turns, ClientConfig::DEFAULT_DEMO_TURNS);
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn overrides_are_applied() {
        let config = config(&[
            ("TURN_MOVE_PACING_MS", "300"),
            ("TURN_HIT_PACING_MS", "900"),
            ("MOVEMENT_MODE", "Constrained"),
            ("GAME_SEED", "17"),
            ("FRAME_INTERVAL_MS", "8"),
            ("DEMO_TURNS", "3"),
            ("LOG_DIR", "/tmp/dungeon"),
        ]);
        assert_eq!(config.turn.move_pacing, Duration::from_millis(300));
        assert_eq!(config.turn.hit_pacing, Duration::from_millis(900));
        assert_eq!(config.turn.movement_mode(), MovementMode::Constrained);
        assert_eq!(config.turn.game.game_seed, 17);
        assert_eq!(config.host.frame_interval, Duration::from_millis(8));
        assert_eq!(config.demo_turns, 3);
        assert_eq!(config.log_dir, Some(PathBuf::from("/tmp/dungeon")));
    }

    #[test]
    fn malformed_values_are_ignored() {
        let config = config(&[("TURN_FINAL_PACING_MS", "soon"), ("MOVEMENT_MODE", "chess")]);
        assert_eq!(config.turn.final_pacing, TurnConfig::DEFAULT_FINAL_PACING);
        assert_eq!(config.turn.movement_mode(), MovementMode::Normal);
    }
}
