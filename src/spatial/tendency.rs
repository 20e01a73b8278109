//! Per-player tendency accumulation over classified combat events
//!
//! Consumes [`SpatialEvent`]s (or raw provider events via
//! [`SpatialTendencyTracker::record_round`]) and accumulates per-player zone
//! distributions, combat counters, opening-duel counts, and weapon usage.
//! Derived rates are computed at read time and default to 0.5 when no
//! rounds have been observed.

use serde::Serialize;

use crate::ingest::RawEvent;
use crate::spatial::zones::{normalize_map_name, zone_for_coordinates, UNKNOWN_ZONE};
use crate::{round1, round2, EventKind, Role, Side};

/// One classified combat event. Created once, consumed immediately, never
/// mutated.
#[derive(Debug, Clone)]
pub struct SpatialEvent {
    pub player: String,
    pub side: Side,
    pub kind: EventKind,
    pub x: f64,
    pub y: f64,
    pub round_number: u32,
    pub map_name: String,
    pub agent: Option<String>,
    pub weapon: Option<String>,
    pub is_opening: bool,
}

/// Event counts across named zones. Counts keep insertion order so argmax
/// ties resolve to the first zone encountered, deterministically.
#[derive(Debug, Clone, Default)]
pub struct ZoneDistribution {
    counts: Vec<(String, u32)>,
    total: u32,
}

impl ZoneDistribution {
    pub fn add(&mut self, zone: &str) {
        match self.counts.iter_mut().find(|(name, _)| name == zone) {
            Some((_, count)) => *count += 1,
            None => self.counts.push((zone.to_string(), 1)),
        }
        self.total += 1;
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    /// Percentage share per zone, one decimal, in first-encountered order.
    pub fn percentages(&self) -> Vec<ZoneShare> {
        if self.total == 0 {
            return Vec::new();
        }
        self.counts
            .iter()
            .map(|(zone, count)| ZoneShare {
                zone: zone.clone(),
                pct: round1(f64::from(*count) / f64::from(self.total) * 100.0),
            })
            .collect()
    }

    /// The most frequent zone and its percentage share. Ties go to the
    /// zone seen first.
    pub fn primary(&self) -> Option<(&str, f64)> {
        let (zone, count) = self
            .counts
            .iter()
            .fold(None::<&(String, u32)>, |best, entry| match best {
                Some(b) if b.1 >= entry.1 => Some(b),
                _ => Some(entry),
            })?;
        let pct = round1(f64::from(*count) / f64::from(self.total) * 100.0);
        Some((zone.as_str(), pct))
    }
}

/// Mutable per-player accumulator, lazily created on first event.
#[derive(Debug, Clone)]
pub struct PlayerTendency {
    pub name: String,
    pub agent: String,
    pub total_kills: u32,
    pub total_deaths: u32,
    pub total_rounds: u32,
    pub rounds_survived: u32,
    pub opening_duels_taken: u32,
    pub opening_duels_won: u32,
    pub defense_zones: ZoneDistribution,
    pub attack_zones: ZoneDistribution,
    weapon_counts: Vec<(String, u32)>,
    map_defense: Vec<(String, ZoneDistribution)>,
}

impl PlayerTendency {
    fn new(name: &str) -> Self {
        PlayerTendency {
            name: name.to_string(),
            agent: "Unknown".to_string(),
            total_kills: 0,
            total_deaths: 0,
            total_rounds: 0,
            rounds_survived: 0,
            opening_duels_taken: 0,
            opening_duels_won: 0,
            defense_zones: ZoneDistribution::default(),
            attack_zones: ZoneDistribution::default(),
            weapon_counts: Vec::new(),
            map_defense: Vec::new(),
        }
    }

    /// Opening-duel pressure normalized against a 30% take rate, clamped to
    /// [0, 1]. Defaults to 0.5 with no observed rounds.
    pub fn aggression_score(&self) -> f64 {
        if self.total_rounds == 0 {
            return 0.5;
        }
        let opening_rate = f64::from(self.opening_duels_taken) / f64::from(self.total_rounds);
        (opening_rate / 0.3).min(1.0)
    }

    /// Share of observed rounds survived; 0.5 with no observed rounds.
    pub fn survival_rate(&self) -> f64 {
        if self.total_rounds == 0 {
            return 0.5;
        }
        f64::from(self.rounds_survived) / f64::from(self.total_rounds)
    }

    /// Kills per death; bare kill count when deathless.
    pub fn kd_ratio(&self) -> f64 {
        if self.total_deaths == 0 {
            return f64::from(self.total_kills);
        }
        round2(f64::from(self.total_kills) / f64::from(self.total_deaths))
    }

    /// Opening duels won per taken; 0.5 when none taken.
    pub fn opening_success_rate(&self) -> f64 {
        if self.opening_duels_taken == 0 {
            return 0.5;
        }
        f64::from(self.opening_duels_won) / f64::from(self.opening_duels_taken)
    }

    /// Most used weapon, ties to the first seen.
    pub fn primary_weapon(&self) -> &str {
        self.weapon_counts
            .iter()
            .fold(None::<&(String, u32)>, |best, entry| match best {
                Some(b) if b.1 >= entry.1 => Some(b),
                _ => Some(entry),
            })
            .map(|(name, _)| name.as_str())
            .unwrap_or("Unknown")
    }

    /// Role implied by the player's current agent.
    pub fn role(&self) -> Option<Role> {
        Role::for_agent(&self.agent)
    }

    /// Style badges. Rules are independent, evaluated in fixed order, and
    /// capped to the first three that match.
    pub fn badges(&self) -> Vec<&'static str> {
        let aggression = self.aggression_score();
        let survival = self.survival_rate();
        let mut badges = Vec::new();

        if aggression >= 0.7 {
            badges.push("First Blood");
            badges.push("Entry");
        } else if aggression >= 0.4 {
            badges.push("Aggressive");
        } else if aggression <= 0.2 {
            badges.push("Passive");
        }

        if survival >= 0.6 {
            badges.push("Anchor");
        }
        if survival >= 0.7 && aggression <= 0.3 {
            badges.push("Site Holder");
        }

        if self.opening_duels_taken >= 5 && self.opening_success_rate() >= 0.6 {
            badges.push("Clutch Opener");
        }

        if self.kd_ratio() >= 1.3 {
            badges.push("High Impact");
        }

        badges.truncate(3);
        badges
    }

    fn record_weapon(&mut self, weapon: &str) {
        match self.weapon_counts.iter_mut().find(|(name, _)| name == weapon) {
            Some((_, count)) => *count += 1,
            None => self.weapon_counts.push((weapon.to_string(), 1)),
        }
    }

    fn map_defense_mut(&mut self, map_name: &str) -> &mut ZoneDistribution {
        let pos = match self.map_defense.iter().position(|(name, _)| name == map_name) {
            Some(pos) => pos,
            None => {
                self.map_defense
                    .push((map_name.to_string(), ZoneDistribution::default()));
                self.map_defense.len() - 1
            }
        };
        &mut self.map_defense[pos].1
    }

    /// Per-map defensive tendencies, most-held maps as observed.
    pub fn map_tendencies(&self) -> Vec<MapTendency> {
        self.map_defense
            .iter()
            .filter_map(|(map, zones)| {
                let (site, pct) = zones.primary()?;
                Some(MapTendency {
                    map: map.clone(),
                    preferred_site: site.to_string(),
                    hold_frequency: pct,
                    defense_events: zones.total(),
                })
            })
            .collect()
    }

    /// Serializable intel for this player.
    pub fn intel(&self) -> PlayerIntel {
        let (def_site, def_pct) = self
            .defense_zones
            .primary()
            .map(|(zone, pct)| (zone.to_string(), pct))
            .unwrap_or((UNKNOWN_ZONE.to_string(), 0.0));
        let (atk_zone, atk_pct) = self
            .attack_zones
            .primary()
            .map(|(zone, pct)| (zone.to_string(), pct))
            .unwrap_or((UNKNOWN_ZONE.to_string(), 0.0));

        PlayerIntel {
            name: self.name.clone(),
            agent: self.agent.clone(),
            role: self
                .role()
                .map(|r| r.to_string())
                .unwrap_or_else(|| "Unknown".to_string()),
            tendencies: TendencyMetrics {
                aggression_score: round2(self.aggression_score()),
                survival_rate: round2(self.survival_rate()),
                kd_ratio: self.kd_ratio(),
                opening_success: round2(self.opening_success_rate()),
                primary_weapon: self.primary_weapon().to_string(),
                badges: self.badges().iter().map(|b| b.to_string()).collect(),
            },
            defensive_setup: DefensiveSetup {
                preferred_site: def_site,
                hold_frequency: def_pct,
                zone_distribution: self.defense_zones.percentages(),
            },
            offensive_setup: OffensiveSetup {
                preferred_zone: atk_zone,
                frequency: atk_pct,
            },
            stats: CombatCounters {
                total_rounds: self.total_rounds,
                kills: self.total_kills,
                deaths: self.total_deaths,
                opening_duels: self.opening_duels_taken,
                opening_wins: self.opening_duels_won,
            },
            map_tendencies: self.map_tendencies(),
        }
    }
}

/// Accumulates tendencies for every player seen in the event stream.
#[derive(Debug, Default)]
pub struct SpatialTendencyTracker {
    players: Vec<PlayerTendency>,
}

impl SpatialTendencyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn player_mut(&mut self, name: &str) -> &mut PlayerTendency {
        let pos = match self.players.iter().position(|p| p.name == name) {
            Some(pos) => pos,
            None => {
                self.players.push(PlayerTendency::new(name));
                self.players.len() - 1
            }
        };
        &mut self.players[pos]
    }

    /// Fold one classified event into the owning player's accumulator.
    pub fn add_event(&mut self, event: &SpatialEvent) {
        let zone = zone_for_coordinates(event.x, event.y, &event.map_name);
        let map_key = normalize_map_name(&event.map_name);

        let player = self.player_mut(&event.player);
        if let Some(agent) = &event.agent {
            player.agent = agent.clone();
        }

        match event.side {
            Side::Defense => {
                player.defense_zones.add(zone);
                player.map_defense_mut(&map_key).add(zone);
            }
            Side::Attack => player.attack_zones.add(zone),
        }

        match event.kind {
            EventKind::Kill => player.total_kills += 1,
            EventKind::Death => player.total_deaths += 1,
        }

        if event.is_opening {
            player.opening_duels_taken += 1;
            if event.kind == EventKind::Kill {
                player.opening_duels_won += 1;
            }
        }

        if let Some(weapon) = &event.weapon {
            player.record_weapon(weapon);
        }
    }

    /// Convert one round's raw provider events and fold them in.
    ///
    /// Kill events attribute to the killer, death events to the victim
    /// (falling back to the killer field when the feed collapses the two).
    /// The first processed event of the round carries the opening-duel flag
    /// until a kill has been seen.
    pub fn record_round(&mut self, map_name: &str, round_number: u32, events: &[RawEvent]) {
        let mut first_blood_found = false;

        for raw in events {
            let kind = match raw.kind.to_ascii_lowercase().as_str() {
                "kill" | "playerkilled" => EventKind::Kill,
                "death" => EventKind::Death,
                other => {
                    log::trace!("skipping non-combat event type {other:?}");
                    continue;
                }
            };

            let actor = match kind {
                EventKind::Kill => raw.killer.as_ref(),
                EventKind::Death => raw.victim.as_ref().or(raw.killer.as_ref()),
            };
            let Some(actor) = actor else {
                log::trace!("combat event with no actor, skipping");
                continue;
            };

            let position = raw.position.unwrap_or_default();
            let side_label = actor
                .team_side
                .as_deref()
                .or(raw.team_side.as_deref())
                .unwrap_or("");

            let is_opening = !first_blood_found;
            if kind == EventKind::Kill {
                first_blood_found = true;
            }

            let event = SpatialEvent {
                player: actor.name.clone(),
                side: Side::from_label(side_label),
                kind,
                x: position.x,
                y: position.y,
                round_number,
                map_name: map_name.to_string(),
                agent: actor.agent.as_ref().map(|a| a.as_str().to_string()),
                weapon: raw.weapon.as_ref().map(|w| w.as_str().to_string()),
                is_opening,
            };
            self.add_event(&event);
        }
    }

    /// Credit a round played (and optionally survived) to a player already
    /// seen in combat events. Unknown players are ignored.
    pub fn record_survival(&mut self, player: &str, survived: bool) {
        if let Some(p) = self.players.iter_mut().find(|p| p.name == player) {
            p.total_rounds += 1;
            if survived {
                p.rounds_survived += 1;
            }
        }
    }

    pub fn players(&self) -> &[PlayerTendency] {
        &self.players
    }

    pub fn get(&self, name: &str) -> Option<&PlayerTendency> {
        self.players.iter().find(|p| p.name == name)
    }

    /// Full roster intel, most aggressive players first.
    pub fn roster_intel(&self) -> Vec<PlayerIntel> {
        let mut roster: Vec<PlayerIntel> = self.players.iter().map(|p| p.intel()).collect();
        roster.sort_by(|a, b| {
            b.tendencies
                .aggression_score
                .partial_cmp(&a.tendencies.aggression_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        roster
    }
}

/// A zone's share of a player's events on one side.
#[derive(Debug, Clone, Serialize)]
pub struct ZoneShare {
    pub zone: String,
    pub pct: f64,
}

/// Serializable per-player scouting intel.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerIntel {
    pub name: String,
    pub agent: String,
    pub role: String,
    pub tendencies: TendencyMetrics,
    pub defensive_setup: DefensiveSetup,
    pub offensive_setup: OffensiveSetup,
    pub stats: CombatCounters,
    pub map_tendencies: Vec<MapTendency>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TendencyMetrics {
    pub aggression_score: f64,
    pub survival_rate: f64,
    pub kd_ratio: f64,
    pub opening_success: f64,
    pub primary_weapon: String,
    pub badges: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DefensiveSetup {
    pub preferred_site: String,
    pub hold_frequency: f64,
    pub zone_distribution: Vec<ZoneShare>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OffensiveSetup {
    pub preferred_zone: String,
    pub frequency: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CombatCounters {
    pub total_rounds: u32,
    pub kills: u32,
    pub deaths: u32,
    pub opening_duels: u32,
    pub opening_wins: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct MapTendency {
    pub map: String,
    pub preferred_site: String,
    pub hold_frequency: f64,
    pub defense_events: u32,
}
