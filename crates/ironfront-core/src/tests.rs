#[cfg(test)]
mod tests {
    use crate::config::MatchRules;
    use crate::constants::*;
    use crate::enums::*;
    use crate::error::ConfigError;
    use crate::events::{KillLogEntry, MatchEvent};
    use crate::state::{LevelProgress, LevelResult, MatchSnapshot};
    use crate::types::{direction_from_angles, heading_of, Position, SimTime};

    #[test]
    fn test_team_opponents() {
        assert_eq!(Team::Friendly.opponent(), Some(Team::Enemy));
        assert_eq!(Team::Enemy.opponent(), Some(Team::Friendly));
        assert_eq!(Team::Neutral.opponent(), None);
        assert!(Team::Friendly.is_hostile_to(Team::Enemy));
        assert!(!Team::Friendly.is_hostile_to(Team::Friendly));
        assert!(!Team::Friendly.is_hostile_to(Team::Neutral));
        assert!(!Team::Neutral.is_hostile_to(Team::Enemy));
    }

    #[test]
    fn test_initial_owner_resolution() {
        assert_eq!(InitialOwner::Neutral.resolve(Team::Friendly), Team::Neutral);
        assert_eq!(InitialOwner::Attacker.resolve(Team::Friendly), Team::Friendly);
        assert_eq!(InitialOwner::Defender.resolve(Team::Friendly), Team::Enemy);
        assert_eq!(InitialOwner::Defender.resolve(Team::Enemy), Team::Friendly);
    }

    #[test]
    fn test_ticket_cost_table() {
        let rules = MatchRules::default();
        let costs = &rules.ticket_costs;
        assert_eq!(costs.cost_of(Some(TankClass::Light)), 100);
        assert_eq!(costs.cost_of(Some(TankClass::Medium)), 200);
        assert_eq!(costs.cost_of(Some(TankClass::Heavy)), 300);
        assert_eq!(costs.cost_of(None), 150);
    }

    #[test]
    fn test_star_thresholds() {
        let stars = MatchRules::default().stars;
        assert_eq!(stars.stars(1000, 1000), 3);
        assert_eq!(stars.stars(990, 1000), 3);
        assert_eq!(stars.stars(989, 1000), 2);
        assert_eq!(stars.stars(700, 1000), 2);
        assert_eq!(stars.stars(400, 1000), 1);
        assert_eq!(stars.stars(399, 1000), 0);
        assert_eq!(stars.stars(0, 0), 0, "No achievable score means no stars");
    }

    #[test]
    fn test_rules_partial_toml_keeps_defaults() {
        let rules = MatchRules::from_toml_str(
            r#"
            ticket_base = 500

            [capture]
            capture_time = 20.0
            drain_amount = 5

            [ai]
            strafe = true
            "#,
        )
        .unwrap();
        assert_eq!(rules.ticket_base, 500);
        assert_eq!(rules.capture.capture_time, 20.0);
        assert_eq!(rules.capture.drain_amount, 5);
        assert_eq!(rules.capture.drain_interval_secs, DRAIN_INTERVAL_SECS);
        assert!(rules.ai.strafe);
        assert_eq!(rules.ai.scan_interval_secs, SCAN_INTERVAL_SECS);
        assert_eq!(rules.player_ticket_bonus, PLAYER_TICKET_BONUS);
    }

    #[test]
    fn test_rules_validation_rejects_zero_capture_time() {
        let err = MatchRules::from_toml_str("[capture]\ncapture_time = 0.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "got {err:?}");
    }

    #[test]
    fn test_rules_validation_rejects_nan() {
        for text in [
            "[capture]\ncapture_time = nan\n",
            "[capture]\nfriendly_rate = nan\n",
            "[capture]\ndrain_interval_secs = inf\n",
            "[ai]\nscan_interval_secs = nan\n",
            "gravity = nan\n",
            "projectile_lifetime_secs = nan\n",
        ] {
            let err = MatchRules::from_toml_str(text).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{text:?} gave {err:?}");
        }
    }

    #[test]
    fn test_rules_validation_rejects_inverted_stars() {
        let err = MatchRules::from_toml_str("[stars]\nthree = 0.5\ntwo = 0.9\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "got {err:?}");
    }

    #[test]
    fn test_rules_parse_error_surfaces() {
        let err = MatchRules::from_toml_str("ticket_base = \"lots\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)), "got {err:?}");
    }

    #[test]
    fn test_level_progress_keeps_best() {
        let mut progress = LevelProgress::default();
        progress.record(&LevelResult {
            score: 800,
            max_score: 1000,
            stars: 2,
            completed: true,
            next_level_unlocked: true,
        });
        progress.record(&LevelResult {
            score: 300,
            max_score: 1000,
            stars: 0,
            completed: false,
            next_level_unlocked: false,
        });
        assert_eq!(progress.best_score, 800);
        assert_eq!(progress.stars, 2);
        assert!(progress.completed);
        assert!(progress.next_level_unlocked);
    }

    #[test]
    fn test_kill_log_markup_uses_team_colors() {
        let entry = KillLogEntry {
            killer: Some("PlayerTank".into()),
            killer_team: Some(Team::Friendly),
            victim: "Raider 2".into(),
            victim_team: Team::Enemy,
        };
        let markup = entry.markup();
        assert!(markup.contains(Team::Friendly.color_hex()));
        assert!(markup.contains(Team::Enemy.color_hex()));
        assert_eq!(entry.to_string(), "PlayerTank destroyed Raider 2");

        let unattributed = KillLogEntry {
            killer: None,
            killer_team: None,
            victim: "Raider 3".into(),
            victim_team: Team::Enemy,
        };
        assert_eq!(unattributed.to_string(), "Raider 3 was destroyed");
    }

    #[test]
    fn test_position_helpers() {
        let a = Position::new(0.0, 0.0, 0.0);
        let b = Position::new(3.0, 4.0, 12.0);
        assert!((a.range_to(&b) - 13.0).abs() < 1e-9);
        assert!((a.horizontal_range_to(&b) - 5.0).abs() < 1e-9);

        let east = Position::new(10.0, 0.0, 0.0);
        assert!((a.bearing_to(&east) - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn test_direction_heading_round_trip() {
        let dir = direction_from_angles(1.0, 0.0);
        assert!((heading_of(dir) - 1.0).abs() < 1e-9);
        let up = direction_from_angles(0.0, std::f64::consts::FRAC_PI_2);
        assert!((up.z - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_sim_time_advance() {
        let mut time = SimTime::default();
        for _ in 0..TICK_RATE {
            time.advance();
        }
        assert_eq!(time.tick, TICK_RATE as u64);
        assert!((time.elapsed_secs - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_snapshot_serializes_with_tagged_events() {
        let snapshot = MatchSnapshot {
            events: vec![MatchEvent::TicketsChanged {
                friendly: 900,
                enemy: 800,
            }],
            ..Default::default()
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"type\":\"TicketsChanged\""));
        let back: MatchSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.events, snapshot.events);
    }
}
