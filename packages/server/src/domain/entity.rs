//! Lobby entities.
//!
//! `Room` is the state machine at the heart of the coordinator. All of its
//! mutating methods validate their preconditions and keep the room
//! invariants intact; the store is responsible for calling them under the
//! per-room critical section.

use rand::Rng;

use super::error::LobbyError;
use super::value_object::{
    ConnectionId, RoomCapacity, RoomId, RoomName, Timestamp, UserId, Username,
};

/// Minimum number of members required to start a round.
pub const MIN_PLAYERS_TO_START: usize = 3;

/// Verified identity bound to a connection, consumed from the auth layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub username: Username,
}

/// Membership record within a room.
///
/// `is_ready` is meaningless for the host: the host is implicitly exempt
/// from the readiness gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub user_id: UserId,
    pub username: Username,
    pub is_ready: bool,
}

impl Player {
    pub fn new(identity: &Identity) -> Self {
        Self {
            user_id: identity.user_id.clone(),
            username: identity.username.clone(),
            is_ready: false,
        }
    }
}

/// Room lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomStatus {
    Waiting,
    InRound,
}

/// Round state, present only while the room is in a round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    /// The member drawn to play the asymmetric pursuer part.
    pub pursuer_id: UserId,
    pub started_at: Timestamp,
}

/// Role a member plays during a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Pursuer,
    Runner,
}

/// Roster entry announced to room members at round start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub user_id: UserId,
    pub username: Username,
    pub role: Role,
}

/// Result of removing a player from a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRemoval {
    /// The removed membership record.
    pub player: Player,
    /// Set when the departing player was host and the room is non-empty:
    /// host passes to the earliest joined remaining member.
    pub new_host: Option<UserId>,
    /// The room must be destroyed when its membership reaches zero.
    pub is_empty: bool,
}

/// A named, capacity-bounded, optionally password-protected group of
/// players sharing a round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: RoomId,
    pub name: RoomName,
    /// SHA-256 hex digest of the room password; `None` means public room.
    pub password_hash: Option<String>,
    pub capacity: RoomCapacity,
    /// Members in join order.
    pub players: Vec<Player>,
    /// Current host. Always a member's id whenever `players` is non-empty.
    pub host_id: UserId,
    pub status: RoomStatus,
    pub round: Option<Round>,
    pub created_at: Timestamp,
}

impl Room {
    /// Create a waiting room with no members.
    ///
    /// The creator becomes host but does NOT auto-join; joining is a
    /// separate explicit step.
    pub fn new(
        id: RoomId,
        name: RoomName,
        password_hash: Option<String>,
        capacity: RoomCapacity,
        host_id: UserId,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            name,
            password_hash,
            capacity,
            players: Vec::new(),
            host_id,
            status: RoomStatus::Waiting,
            round: None,
            created_at,
        }
    }

    pub fn has_password(&self) -> bool {
        self.password_hash.is_some()
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn is_full(&self) -> bool {
        self.players.len() >= usize::from(self.capacity.value())
    }

    pub fn is_member(&self, user_id: &UserId) -> bool {
        self.players.iter().any(|p| &p.user_id == user_id)
    }

    /// Compare a candidate password digest against the room's.
    ///
    /// A public room matches any candidate, like the original lobby did.
    pub fn password_matches(&self, candidate_hash: Option<&str>) -> bool {
        match &self.password_hash {
            None => true,
            Some(hash) => candidate_hash == Some(hash.as_str()),
        }
    }

    /// Append a member, preserving join order.
    pub fn add_player(&mut self, player: Player) -> Result<(), LobbyError> {
        if self.is_member(&player.user_id) {
            return Err(LobbyError::AlreadyMember);
        }
        if self.is_full() {
            return Err(LobbyError::RoomFull);
        }
        self.players.push(player);
        Ok(())
    }

    /// Flip the ready flag of the given member and return the new value.
    ///
    /// The host's flip is accepted but has no gameplay effect.
    pub fn toggle_ready(&mut self, user_id: &UserId) -> Result<bool, LobbyError> {
        let player = self
            .players
            .iter_mut()
            .find(|p| &p.user_id == user_id)
            .ok_or(LobbyError::NotAMember)?;
        player.is_ready = !player.is_ready;
        Ok(player.is_ready)
    }

    /// Start a round: caller must be host, at least [`MIN_PLAYERS_TO_START`]
    /// members, every non-host member ready.
    ///
    /// Draws the pursuer uniformly at random among current members and
    /// records the start time.
    pub fn start_round<R: Rng>(
        &mut self,
        caller: &UserId,
        rng: &mut R,
        now: Timestamp,
    ) -> Result<Round, LobbyError> {
        if caller != &self.host_id {
            return Err(LobbyError::NotHost);
        }
        if self.players.len() < MIN_PLAYERS_TO_START {
            return Err(LobbyError::NotEnoughPlayers);
        }
        let all_ready = self
            .players
            .iter()
            .all(|p| p.user_id == self.host_id || p.is_ready);
        if !all_ready {
            return Err(LobbyError::PlayersNotReady);
        }

        let index = rng.gen_range(0..self.players.len());
        let round = Round {
            pursuer_id: self.players[index].user_id.clone(),
            started_at: now,
        };
        self.status = RoomStatus::InRound;
        self.round = Some(round.clone());
        Ok(round)
    }

    /// Remove a member. Reassigns the host to the earliest joined remaining
    /// member when the host leaves a non-empty room.
    pub fn remove_player(&mut self, user_id: &UserId) -> Result<PlayerRemoval, LobbyError> {
        let index = self
            .players
            .iter()
            .position(|p| &p.user_id == user_id)
            .ok_or(LobbyError::NotAMember)?;
        let player = self.players.remove(index);

        if self.players.is_empty() {
            return Ok(PlayerRemoval {
                player,
                new_host: None,
                is_empty: true,
            });
        }

        let new_host = if &self.host_id == user_id {
            let next = self.players[0].user_id.clone();
            self.host_id = next.clone();
            Some(next)
        } else {
            None
        };

        Ok(PlayerRemoval {
            player,
            new_host,
            is_empty: false,
        })
    }

    /// Roster with roles, valid only once a round has been started.
    pub fn roster(&self) -> Vec<RosterEntry> {
        let pursuer_id = self.round.as_ref().map(|r| &r.pursuer_id);
        self.players
            .iter()
            .map(|p| RosterEntry {
                user_id: p.user_id.clone(),
                username: p.username.clone(),
                role: if Some(&p.user_id) == pursuer_id {
                    Role::Pursuer
                } else {
                    Role::Runner
                },
            })
            .collect()
    }

    /// The subset of room fields safe to broadcast to all connections.
    pub fn summary(&self) -> RoomSummary {
        RoomSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            has_password: self.has_password(),
            capacity: self.capacity,
            player_count: self.players.len(),
            status: self.status,
            created_at: self.created_at,
        }
    }
}

/// Public room listing entry. Never exposes the password hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSummary {
    pub id: RoomId,
    pub name: RoomName,
    pub has_password: bool,
    pub capacity: RoomCapacity,
    pub player_count: usize,
    pub status: RoomStatus,
    pub created_at: Timestamp,
}

/// Registry snapshot row for the online player list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnlinePlayer {
    pub user_id: UserId,
    pub username: Username,
    pub connection_id: ConnectionId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashMap;

    fn identity(name: &str) -> Identity {
        Identity {
            user_id: UserId::new(name.to_string()).unwrap(),
            username: Username::new(name.to_string()).unwrap(),
        }
    }

    fn test_room(capacity: i64, host: &str) -> Room {
        Room::new(
            RoomId::generate(),
            RoomName::new("hideout".to_string()).unwrap(),
            None,
            RoomCapacity::clamped(capacity),
            UserId::new(host.to_string()).unwrap(),
            Timestamp::new(1000),
        )
    }

    fn join(room: &mut Room, name: &str) {
        room.add_player(Player::new(&identity(name))).unwrap();
    }

    #[test]
    fn test_new_room_is_waiting_and_empty() {
        // given / when:
        let room = test_room(4, "alice");

        // then:
        assert_eq!(room.status, RoomStatus::Waiting);
        assert_eq!(room.player_count(), 0);
        assert!(room.round.is_none());
        assert_eq!(room.host_id.as_str(), "alice");
    }

    #[test]
    fn test_join_full_room_fails_with_room_full() {
        // given:
        let mut room = test_room(3, "alice");
        join(&mut room, "alice");
        join(&mut room, "bob");
        join(&mut room, "charlie");

        // when:
        let result = room.add_player(Player::new(&identity("dave")));

        // then:
        assert_eq!(result, Err(LobbyError::RoomFull));
        assert_eq!(room.player_count(), 3);
    }

    #[test]
    fn test_join_twice_fails_with_already_member() {
        // given:
        let mut room = test_room(4, "alice");
        join(&mut room, "alice");

        // when:
        let result = room.add_player(Player::new(&identity("alice")));

        // then:
        assert_eq!(result, Err(LobbyError::AlreadyMember));
    }

    #[test]
    fn test_toggle_ready_flips_flag() {
        // given:
        let mut room = test_room(4, "alice");
        join(&mut room, "alice");
        join(&mut room, "bob");
        let bob = UserId::new("bob".to_string()).unwrap();

        // when / then:
        assert_eq!(room.toggle_ready(&bob), Ok(true));
        assert_eq!(room.toggle_ready(&bob), Ok(false));
    }

    #[test]
    fn test_toggle_ready_for_non_member_fails() {
        // given:
        let mut room = test_room(4, "alice");
        join(&mut room, "alice");

        // when:
        let result = room.toggle_ready(&UserId::new("ghost".to_string()).unwrap());

        // then:
        assert_eq!(result, Err(LobbyError::NotAMember));
    }

    #[test]
    fn test_start_round_requires_host() {
        // given:
        let mut room = ready_room();
        let bob = UserId::new("bob".to_string()).unwrap();

        // when:
        let mut rng = StdRng::seed_from_u64(1);
        let result = room.start_round(&bob, &mut rng, Timestamp::new(2000));

        // then:
        assert_eq!(result, Err(LobbyError::NotHost));
    }

    #[test]
    fn test_start_round_requires_three_players() {
        // given:
        let mut room = test_room(4, "alice");
        join(&mut room, "alice");
        join(&mut room, "bob");
        room.toggle_ready(&UserId::new("bob".to_string()).unwrap())
            .unwrap();
        let alice = UserId::new("alice".to_string()).unwrap();

        // when:
        let mut rng = StdRng::seed_from_u64(1);
        let result = room.start_round(&alice, &mut rng, Timestamp::new(2000));

        // then:
        assert_eq!(result, Err(LobbyError::NotEnoughPlayers));
    }

    #[test]
    fn test_start_round_requires_all_non_host_members_ready() {
        // given:
        let mut room = test_room(4, "alice");
        join(&mut room, "alice");
        join(&mut room, "bob");
        join(&mut room, "charlie");
        room.toggle_ready(&UserId::new("bob".to_string()).unwrap())
            .unwrap();
        // charlie is not ready
        let alice = UserId::new("alice".to_string()).unwrap();

        // when:
        let mut rng = StdRng::seed_from_u64(1);
        let result = room.start_round(&alice, &mut rng, Timestamp::new(2000));

        // then:
        assert_eq!(result, Err(LobbyError::PlayersNotReady));
    }

    /// A 3-member room hosted by alice where everyone but the host is ready.
    fn ready_room() -> Room {
        let mut room = test_room(4, "alice");
        join(&mut room, "alice");
        join(&mut room, "bob");
        join(&mut room, "charlie");
        room.toggle_ready(&UserId::new("bob".to_string()).unwrap())
            .unwrap();
        room.toggle_ready(&UserId::new("charlie".to_string()).unwrap())
            .unwrap();
        room
    }

    #[test]
    fn test_start_round_succeeds_with_host_exempt_from_readiness() {
        // given: alice (host) never toggled ready
        let mut room = ready_room();
        let alice = UserId::new("alice".to_string()).unwrap();

        // when:
        let mut rng = StdRng::seed_from_u64(42);
        let result = room.start_round(&alice, &mut rng, Timestamp::new(2000));

        // then:
        let round = result.unwrap();
        assert_eq!(room.status, RoomStatus::InRound);
        assert_eq!(round.started_at, Timestamp::new(2000));
        assert!(room.is_member(&round.pursuer_id));
    }

    #[test]
    fn test_roster_tags_exactly_one_pursuer() {
        // given:
        let mut room = ready_room();
        let alice = UserId::new("alice".to_string()).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let round = room
            .start_round(&alice, &mut rng, Timestamp::new(2000))
            .unwrap();

        // when:
        let roster = room.roster();

        // then:
        assert_eq!(roster.len(), 3);
        let pursuers: Vec<_> = roster
            .iter()
            .filter(|e| e.role == Role::Pursuer)
            .collect();
        assert_eq!(pursuers.len(), 1);
        assert_eq!(pursuers[0].user_id, round.pursuer_id);
    }

    #[test]
    fn test_pursuer_draw_is_roughly_uniform() {
        // given: many fresh rooms with the same 4 members
        let trials = 4000;
        let mut counts: HashMap<String, usize> = HashMap::new();
        let mut rng = StdRng::seed_from_u64(12345);
        let alice = UserId::new("alice".to_string()).unwrap();

        // when:
        for _ in 0..trials {
            let mut room = test_room(4, "alice");
            for name in ["alice", "bob", "charlie", "dave"] {
                join(&mut room, name);
            }
            for name in ["bob", "charlie", "dave"] {
                room.toggle_ready(&UserId::new(name.to_string()).unwrap())
                    .unwrap();
            }
            let round = room
                .start_round(&alice, &mut rng, Timestamp::new(2000))
                .unwrap();
            *counts
                .entry(round.pursuer_id.as_str().to_string())
                .or_default() += 1;
        }

        // then: each member drawn roughly trials/4 times (loose bound)
        assert_eq!(counts.len(), 4);
        for (member, count) in counts {
            assert!(
                count > trials / 8 && count < trials / 2,
                "member '{}' drawn {} times out of {}",
                member,
                count,
                trials
            );
        }
    }

    #[test]
    fn test_host_leave_passes_host_to_earliest_joined_member() {
        // given:
        let mut room = test_room(4, "alice");
        join(&mut room, "alice");
        join(&mut room, "bob");
        join(&mut room, "charlie");
        let alice = UserId::new("alice".to_string()).unwrap();

        // when:
        let removal = room.remove_player(&alice).unwrap();

        // then:
        assert!(!removal.is_empty);
        assert_eq!(
            removal.new_host,
            Some(UserId::new("bob".to_string()).unwrap())
        );
        assert_eq!(room.host_id.as_str(), "bob");
    }

    #[test]
    fn test_non_host_leave_keeps_host() {
        // given:
        let mut room = test_room(4, "alice");
        join(&mut room, "alice");
        join(&mut room, "bob");
        let bob = UserId::new("bob".to_string()).unwrap();

        // when:
        let removal = room.remove_player(&bob).unwrap();

        // then:
        assert_eq!(removal.new_host, None);
        assert_eq!(room.host_id.as_str(), "alice");
    }

    #[test]
    fn test_last_leave_marks_room_empty() {
        // given:
        let mut room = test_room(4, "alice");
        join(&mut room, "alice");
        let alice = UserId::new("alice".to_string()).unwrap();

        // when:
        let removal = room.remove_player(&alice).unwrap();

        // then:
        assert!(removal.is_empty);
        assert_eq!(room.player_count(), 0);
    }

    #[test]
    fn test_public_room_matches_any_password() {
        // given:
        let room = test_room(4, "alice");

        // then:
        assert!(room.password_matches(None));
        assert!(room.password_matches(Some("anything")));
    }

    #[test]
    fn test_protected_room_requires_matching_digest() {
        // given:
        let mut room = test_room(4, "alice");
        room.password_hash = Some("digest".to_string());

        // then:
        assert!(room.password_matches(Some("digest")));
        assert!(!room.password_matches(Some("other")));
        assert!(!room.password_matches(None));
    }

    #[test]
    fn test_summary_hides_password_and_counts_members() {
        // given:
        let mut room = test_room(5, "alice");
        room.password_hash = Some("digest".to_string());
        join(&mut room, "alice");
        join(&mut room, "bob");

        // when:
        let summary = room.summary();

        // then:
        assert!(summary.has_password);
        assert_eq!(summary.player_count, 2);
        assert_eq!(summary.capacity.value(), 5);
        assert_eq!(summary.status, RoomStatus::Waiting);
    }
}
