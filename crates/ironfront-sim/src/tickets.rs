//! Ticket economy and match outcome.
//!
//! `TicketLedger` is the match controller's bookkeeping: both ticket pools,
//! alive counts, score, the kill log and the terminal outcome. Once the
//! outcome is terminal every further ticket or kill report is ignored.

use std::collections::VecDeque;

use tracing::info;

use ironfront_core::config::{MatchRules, StarThresholds};
use ironfront_core::enums::{MatchOutcome, Team};
use ironfront_core::events::{KillLogEntry, MatchEvent};
use ironfront_core::state::{LevelResult, TicketView};

/// One spawned tank as counted at match start.
#[derive(Debug, Clone, Copy)]
pub struct RosterEntry {
    pub team: Team,
    pub ticket_cost: u32,
    pub player: bool,
}

/// Who landed the killing blow.
#[derive(Debug, Clone)]
pub struct Killer {
    pub name: String,
    pub team: Team,
}

#[derive(Debug, Clone)]
pub struct TicketLedger {
    friendly: u32,
    enemy: u32,
    friendly_alive: u32,
    enemy_alive: u32,
    score: u32,
    max_score: u32,
    outcome: MatchOutcome,
    kill_log: VecDeque<KillLogEntry>,
    kill_log_capacity: usize,
    stars: StarThresholds,
    events: Vec<MatchEvent>,
}

impl TicketLedger {
    /// Build the pools from the tanks on the field: base plus the cost of
    /// every tank on the team, plus the bonus for a team fielding a player.
    /// The maximum score is the total cost of the enemy roster.
    pub fn new(rules: &MatchRules, roster: impl IntoIterator<Item = RosterEntry>) -> Self {
        let mut ledger = Self {
            friendly: rules.ticket_base,
            enemy: rules.ticket_base,
            friendly_alive: 0,
            enemy_alive: 0,
            score: 0,
            max_score: 0,
            outcome: MatchOutcome::InProgress,
            kill_log: VecDeque::with_capacity(rules.kill_log_capacity),
            kill_log_capacity: rules.kill_log_capacity,
            stars: rules.stars.clone(),
            events: Vec::new(),
        };

        let mut friendly_player = false;
        let mut enemy_player = false;
        for entry in roster {
            match entry.team {
                Team::Friendly => {
                    ledger.friendly += entry.ticket_cost;
                    ledger.friendly_alive += 1;
                    friendly_player |= entry.player;
                }
                Team::Enemy => {
                    ledger.enemy += entry.ticket_cost;
                    ledger.enemy_alive += 1;
                    ledger.max_score += entry.ticket_cost;
                    enemy_player |= entry.player;
                }
                Team::Neutral => {}
            }
        }
        if friendly_player {
            ledger.friendly += rules.player_ticket_bonus;
        }
        if enemy_player {
            ledger.enemy += rules.player_ticket_bonus;
        }

        ledger.events.push(MatchEvent::TicketsChanged {
            friendly: ledger.friendly,
            enemy: ledger.enemy,
        });
        ledger.events.push(MatchEvent::TankCountChanged {
            friendly: ledger.friendly_alive,
            enemy: ledger.enemy_alive,
        });
        ledger
    }

    pub fn tickets(&self, team: Team) -> u32 {
        match team {
            Team::Friendly => self.friendly,
            Team::Enemy => self.enemy,
            Team::Neutral => 0,
        }
    }

    pub fn alive(&self, team: Team) -> u32 {
        match team {
            Team::Friendly => self.friendly_alive,
            Team::Enemy => self.enemy_alive,
            Team::Neutral => 0,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn max_score(&self) -> u32 {
        self.max_score
    }

    pub fn outcome(&self) -> MatchOutcome {
        self.outcome
    }

    pub fn kill_log(&self) -> impl Iterator<Item = &KillLogEntry> {
        self.kill_log.iter()
    }

    /// Record a destroyed tank. Returns false if the report was ignored.
    pub fn on_tank_destroyed(
        &mut self,
        victim_team: Team,
        ticket_cost: u32,
        killer: Option<&Killer>,
        victim_name: &str,
    ) -> bool {
        if self.outcome.is_terminal() || victim_team == Team::Neutral {
            return false;
        }

        let pool = self.pool_mut(victim_team);
        *pool = pool.saturating_sub(ticket_cost);
        if victim_team == Team::Enemy {
            self.score += ticket_cost;
            self.events.push(MatchEvent::ScoreChanged { score: self.score });
        }
        match victim_team {
            Team::Friendly => self.friendly_alive = self.friendly_alive.saturating_sub(1),
            _ => self.enemy_alive = self.enemy_alive.saturating_sub(1),
        }

        let entry = KillLogEntry {
            killer: killer.map(|k| k.name.clone()),
            killer_team: killer.map(|k| k.team),
            victim: victim_name.to_string(),
            victim_team,
        };
        info!(target: "ironfront::tickets", "{}", entry);
        if self.kill_log.len() >= self.kill_log_capacity {
            self.kill_log.pop_front();
        }
        if self.kill_log_capacity > 0 {
            self.kill_log.push_back(entry.clone());
        }

        self.events.push(MatchEvent::TicketsChanged {
            friendly: self.friendly,
            enemy: self.enemy,
        });
        self.events.push(MatchEvent::TankCountChanged {
            friendly: self.friendly_alive,
            enemy: self.enemy_alive,
        });
        self.events.push(MatchEvent::KillLogUpdated { entry });

        self.evaluate();
        true
    }

    /// Drain `amount` tickets from `team`, clamped at zero. Returns false if
    /// nothing changed.
    pub fn drain(&mut self, team: Team, amount: u32) -> bool {
        if self.outcome.is_terminal() || team == Team::Neutral {
            return false;
        }
        let pool = self.pool_mut(team);
        if *pool == 0 || amount == 0 {
            return false;
        }
        *pool = pool.saturating_sub(amount);

        self.events.push(MatchEvent::TicketsChanged {
            friendly: self.friendly,
            enemy: self.enemy,
        });
        self.evaluate();
        true
    }

    /// Stars and completion for a finished match; None while in progress.
    pub fn result(&self) -> Option<LevelResult> {
        if !self.outcome.is_terminal() {
            return None;
        }
        let won = self.outcome == MatchOutcome::Victory;
        Some(LevelResult {
            score: self.score,
            max_score: self.max_score,
            stars: if won { self.stars.stars(self.score, self.max_score) } else { 0 },
            completed: won,
            next_level_unlocked: won,
        })
    }

    pub fn view(&self) -> TicketView {
        TicketView {
            friendly: self.friendly,
            enemy: self.enemy,
            friendly_alive: self.friendly_alive,
            enemy_alive: self.enemy_alive,
            score: self.score,
            max_score: self.max_score,
        }
    }

    /// Events emitted since the last call.
    pub fn take_events(&mut self) -> Vec<MatchEvent> {
        std::mem::take(&mut self.events)
    }

    fn pool_mut(&mut self, team: Team) -> &mut u32 {
        match team {
            Team::Friendly => &mut self.friendly,
            _ => &mut self.enemy,
        }
    }

    fn evaluate(&mut self) {
        if self.outcome.is_terminal() {
            return;
        }
        let outcome = if self.friendly == 0 {
            MatchOutcome::Defeat
        } else if self.enemy == 0 || self.enemy_alive == 0 {
            MatchOutcome::Victory
        } else {
            return;
        };
        self.outcome = outcome;
        info!(
            target: "ironfront::tickets",
            ?outcome,
            friendly = self.friendly,
            enemy = self.enemy,
            score = self.score,
            "match ended"
        );
        self.events.push(MatchEvent::MatchEnded { outcome });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<RosterEntry> {
        vec![
            RosterEntry { team: Team::Friendly, ticket_cost: 200, player: true },
            RosterEntry { team: Team::Friendly, ticket_cost: 100, player: false },
            RosterEntry { team: Team::Enemy, ticket_cost: 200, player: false },
            RosterEntry { team: Team::Enemy, ticket_cost: 300, player: false },
            RosterEntry { team: Team::Neutral, ticket_cost: 150, player: false },
        ]
    }

    fn ledger() -> TicketLedger {
        TicketLedger::new(&MatchRules::default(), roster())
    }

    fn player() -> Killer {
        Killer {
            name: "PlayerTank".into(),
            team: Team::Friendly,
        }
    }

    #[test]
    fn test_initial_pools() {
        let l = ledger();
        assert_eq!(l.tickets(Team::Friendly), 1000 + 300 + 300);
        assert_eq!(l.tickets(Team::Enemy), 1000 + 500);
        assert_eq!(l.max_score(), 500);
        assert_eq!(l.alive(Team::Friendly), 2);
        assert_eq!(l.alive(Team::Enemy), 2);
        assert_eq!(l.outcome(), MatchOutcome::InProgress);
    }

    #[test]
    fn test_enemy_kill_by_player() {
        let mut l = ledger();
        l.take_events();
        assert!(l.on_tank_destroyed(Team::Enemy, 200, Some(&player()), "Enemy Medium 1"));

        assert_eq!(l.tickets(Team::Enemy), 1300);
        assert_eq!(l.score(), 200);
        assert_eq!(l.alive(Team::Enemy), 1);
        let log: Vec<_> = l.kill_log().collect();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].killer.as_deref(), Some("PlayerTank"));
        assert!(log[0].markup().contains("<color="));

        let events = l.take_events();
        assert!(events.contains(&MatchEvent::ScoreChanged { score: 200 }));
        assert!(events.contains(&MatchEvent::TankCountChanged { friendly: 2, enemy: 1 }));
        assert!(events.iter().any(|e| matches!(e, MatchEvent::KillLogUpdated { .. })));
    }

    #[test]
    fn test_friendly_loss_does_not_score() {
        let mut l = ledger();
        l.on_tank_destroyed(Team::Friendly, 100, None, "Friendly Light 1");
        assert_eq!(l.score(), 0);
        assert_eq!(l.tickets(Team::Friendly), 1500);
        assert_eq!(l.kill_log().next().map(|e| e.to_string()).as_deref(), Some("Friendly Light 1 was destroyed"));
    }

    #[test]
    fn test_drain_clamps_and_stops_at_zero() {
        let rules = MatchRules {
            ticket_base: 25,
            ..Default::default()
        };
        let mut l = TicketLedger::new(
            &rules,
            [
                RosterEntry { team: Team::Friendly, ticket_cost: 0, player: false },
                RosterEntry { team: Team::Enemy, ticket_cost: 0, player: false },
            ],
        );
        assert!(l.drain(Team::Enemy, 10));
        assert!(l.drain(Team::Enemy, 10));
        assert!(l.drain(Team::Enemy, 10));
        assert_eq!(l.tickets(Team::Enemy), 0);
        assert_eq!(l.outcome(), MatchOutcome::Victory);
        assert!(!l.drain(Team::Enemy, 10));
        assert_eq!(l.tickets(Team::Enemy), 0);
    }

    #[test]
    fn test_defeat_declared_once() {
        let rules = MatchRules {
            ticket_base: 10,
            ..Default::default()
        };
        let mut l = TicketLedger::new(
            &rules,
            [
                RosterEntry { team: Team::Friendly, ticket_cost: 0, player: false },
                RosterEntry { team: Team::Enemy, ticket_cost: 0, player: false },
            ],
        );
        l.take_events();
        assert!(l.drain(Team::Friendly, 10));
        assert_eq!(l.outcome(), MatchOutcome::Defeat);
        assert_eq!(l.alive(Team::Enemy), 1);

        // Same tick: enemy pool would also empty
        assert!(!l.drain(Team::Enemy, 10));
        assert!(!l.on_tank_destroyed(Team::Enemy, 0, None, "late"));
        assert_eq!(l.outcome(), MatchOutcome::Defeat);

        let ended = l
            .take_events()
            .into_iter()
            .filter(|e| matches!(e, MatchEvent::MatchEnded { .. }))
            .count();
        assert_eq!(ended, 1);
        let result = l.result().unwrap();
        assert!(!result.completed);
        assert_eq!(result.stars, 0);
    }

    #[test]
    fn test_last_enemy_down_is_victory() {
        let mut l = ledger();
        l.on_tank_destroyed(Team::Enemy, 200, Some(&player()), "a");
        l.on_tank_destroyed(Team::Enemy, 300, Some(&player()), "b");
        assert_eq!(l.outcome(), MatchOutcome::Victory);
        let result = l.result().unwrap();
        assert_eq!(result.score, 500);
        assert_eq!(result.stars, 3);
        assert!(result.completed && result.next_level_unlocked);
    }

    #[test]
    fn test_kill_log_evicts_oldest() {
        let rules = MatchRules {
            kill_log_capacity: 2,
            ..Default::default()
        };
        let roster = (0..5)
            .map(|_| RosterEntry { team: Team::Friendly, ticket_cost: 0, player: false })
            .chain([RosterEntry { team: Team::Enemy, ticket_cost: 0, player: false }]);
        let mut l = TicketLedger::new(&rules, roster);
        for name in ["a", "b", "c"] {
            l.on_tank_destroyed(Team::Friendly, 0, None, name);
        }
        let victims: Vec<_> = l.kill_log().map(|e| e.victim.as_str()).collect();
        assert_eq!(victims, ["b", "c"]);
    }

    #[test]
    fn test_neutral_reports_ignored() {
        let mut l = ledger();
        assert!(!l.on_tank_destroyed(Team::Neutral, 150, None, "crate"));
        assert!(!l.drain(Team::Neutral, 10));
        assert_eq!(l.kill_log().count(), 0);
    }
}
