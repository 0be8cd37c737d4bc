use bracketry::*;
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

fn roster(count: usize) -> Vec<Participant> {
    (0..count)
        .map(|i| {
            let name = format!("P{}", i + 1);
            Participant::new(name.as_str(), name.as_str(), i as u32 + 1)
        })
        .collect()
}

fn named(names: &[&str]) -> Vec<Participant> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| Participant::new(*name, *name, i as u32 + 1))
        .collect()
}

fn lead(slot: &Slot) -> Option<&str> {
    slot.entrant().map(|e| e.lead.as_str())
}

/// Unordered pairs of singles entrants over all playable matches.
fn pairings(bracket: &Bracket) -> Vec<(String, String)> {
    bracket
        .matches()
        .iter()
        .filter(|m| !m.is_bye)
        .filter_map(|m| {
            let left = lead(&m.left)?.to_string();
            let right = lead(&m.right)?.to_string();
            Some(if left < right { (left, right) } else { (right, left) })
        })
        .collect()
}

/// Play every match in id order, picking the winning side with `pick`.
fn play_out(bracket: &mut Bracket, mut pick: impl FnMut(MatchId) -> Side) {
    let ids: Vec<MatchId> = bracket.matches().iter().map(|m| m.id).collect();
    for id in ids {
        bracket.record_result(id, Outcome::Win(pick(id))).unwrap();
    }
}

fn bracket_size(count: usize) -> usize {
    count.max(2).next_power_of_two()
}

/// Round robin with an even count: N-1 rounds, every pair once, no byes.
#[test]
fn test_round_robin_even() {
    let bracket = Bracket::generate(ScheduleKind::RoundRobin, roster(6), false);

    assert_eq!(bracket.rounds().len(), 5);
    assert!(bracket.matches().iter().all(|m| !m.is_bye));

    let pairs = pairings(&bracket);
    let unique: HashSet<_> = pairs.iter().cloned().collect();
    assert_eq!(pairs.len(), 15);
    assert_eq!(unique.len(), 15);
}

/// Round robin with an odd count: N rounds, one bye per round, one bye each.
#[test]
fn test_round_robin_odd() {
    let bracket = Bracket::generate(ScheduleKind::RoundRobin, roster(5), false);

    assert_eq!(bracket.rounds().len(), 5);
    for round in bracket.rounds() {
        let byes = round
            .matches
            .iter()
            .filter(|id| bracket.get(**id).unwrap().is_bye)
            .count();
        assert_eq!(byes, 1, "round {}", round.value);
    }

    let mut byes: HashMap<String, usize> = HashMap::new();
    for m in bracket.matches().iter().filter(|m| m.is_bye) {
        let entrant = m.winner_entrant().unwrap();
        *byes.entry(entrant.lead.to_string()).or_default() += 1;
    }
    assert_eq!(byes.len(), 5);
    assert!(byes.values().all(|count| *count == 1));
}

/// Three players pad to four: 3 rounds of 2 matches, 2 games and 1 bye each.
#[test]
fn test_three_player_round_robin() {
    let bracket = Bracket::generate(ScheduleKind::RoundRobin, named(&["A", "B", "C"]), false);

    assert_eq!(bracket.rounds().len(), 3);
    assert!(bracket.rounds().iter().all(|round| round.matches.len() == 2));

    for record in bracket.standings() {
        assert_eq!(record.participated, 2, "{}", record.name);
        assert_eq!(record.byes, 1, "{}", record.name);
    }

    let stats = bracket.statistics();
    assert_eq!(stats.matches, 3);
    assert_eq!(stats.byes, 3);
    assert_eq!(stats.n_over_p, 2);
}

/// Single elimination: log2(M) rounds, M-1 matches, one undefeated player.
#[test]
fn test_single_elimination_shape() {
    for count in [2, 3, 5, 8, 13, 16, 33] {
        let mut bracket = Bracket::generate(ScheduleKind::SingleElimination, roster(count), false);
        let size = bracket_size(count);

        assert_eq!(bracket.rounds().len(), size.trailing_zeros() as usize);
        assert_eq!(bracket.match_count(), size - 1);

        play_out(&mut bracket, |id| {
            if id.get() % 3 == 0 {
                Side::Right
            } else {
                Side::Left
            }
        });
        assert!(bracket.is_complete());

        let undefeated: Vec<_> = bracket
            .standings()
            .into_iter()
            .filter(|record| record.losses == 0)
            .collect();
        assert_eq!(undefeated.len(), 1, "{count} players");
        assert_eq!(
            Some(&undefeated[0].participant_id),
            bracket.champion().map(|e| &e.lead)
        );
    }
}

/// The grand final is the last match, flagged, fed by both bracket champions.
#[test]
fn test_double_elimination_grand_final() {
    for count in 2..=16 {
        let bracket = Bracket::generate(ScheduleKind::DoubleElimination, roster(count), false);
        let grand_final = bracket.matches().last().unwrap();

        assert!(grand_final.is_finals, "{count} players");
        assert_eq!(bracket.final_match().map(|m| m.id), Some(grand_final.id));
        assert_eq!(
            bracket.matches().iter().filter(|m| m.is_finals).count(),
            1
        );

        let winners_final = grand_final.prev_left.unwrap();
        let losers_final = grand_final.prev_right.unwrap();
        assert_eq!(bracket.get(winners_final).unwrap().partition, Partition::Winners);
        assert_eq!(bracket.successor(winners_final), Some((grand_final.id, Side::Left)));
        assert_eq!(
            bracket.losers().last().and_then(|round| round.matches.last()),
            Some(&losers_final)
        );
    }
}

/// Entering the same result twice leaves the graph as it was.
#[test]
fn test_record_result_is_idempotent() {
    let mut bracket = Bracket::generate(ScheduleKind::DoubleElimination, roster(6), false);
    // Matches 1 and 2 are byes for the top seeds
    let id = MatchId::new(3);

    assert_eq!(bracket.record_result(id, Outcome::Win(Side::Left)), Ok(true));
    let once = bracket.clone();
    assert_eq!(bracket.record_result(id, Outcome::Win(Side::Left)), Ok(false));
    assert_eq!(bracket.matches(), once.matches());
}

/// Four players: changing the first result moves the new winner into the
/// final and clears the final's result.
#[test]
fn test_four_player_cascade() {
    let mut bracket = Bracket::generate(
        ScheduleKind::SingleElimination,
        named(&["A", "B", "C", "D"]),
        false,
    );
    let first = bracket.get(MatchId::new(1)).unwrap();
    assert_eq!((lead(&first.left), lead(&first.right)), (Some("A"), Some("D")));
    let second = bracket.get(MatchId::new(2)).unwrap();
    assert_eq!((lead(&second.left), lead(&second.right)), (Some("B"), Some("C")));

    bracket.record_result(MatchId::new(1), Outcome::Win(Side::Left)).unwrap();
    bracket.record_result(MatchId::new(2), Outcome::Win(Side::Left)).unwrap();
    let last = bracket.get(MatchId::new(3)).unwrap();
    assert_eq!((lead(&last.left), lead(&last.right)), (Some("A"), Some("B")));

    bracket.record_result(MatchId::new(3), Outcome::Win(Side::Right)).unwrap();
    assert_eq!(bracket.champion().map(|e| e.lead.as_str()), Some("B"));

    // D wins match 1 after all
    bracket.record_result(MatchId::new(1), Outcome::Win(Side::Right)).unwrap();
    let last = bracket.get(MatchId::new(3)).unwrap();
    assert_eq!(lead(&last.left), Some("D"));
    assert_eq!(lead(&last.right), Some("B"));
    assert!(!last.is_decided());
    assert!(bracket.champion().is_none());
}

/// Equal wins and draws fall back to points difference.
#[test]
fn test_ranking_by_points_difference() {
    let players = named(&["Y", "X", "Z"]);
    let single = |name: &str| Slot::Resolved(Entrant::single(name.into()));
    let won = |id: u32, winner: &str, loser: &str, margin: i32| {
        let mut m = Match::new(
            MatchId::new(id),
            Partition::Winners,
            1,
            single(winner),
            single(loser),
        );
        m.winner = Some(Side::Left);
        m.left_score = 10 + margin;
        m.right_score = 10;
        m
    };
    let matches = [
        won(1, "X", "Z", 3),
        won(2, "X", "Z", 2),
        won(3, "Y", "Z", 1),
        won(4, "Y", "Z", 1),
    ];

    let table = compute_standings(&players, &matches);
    assert_eq!(table[0].name, "X");
    assert_eq!(table[0].points_difference, 5);
    assert_eq!(table[1].name, "Y");
    assert_eq!(table[1].points_difference, 2);
    assert_eq!(table[1].prior_rank, 1);
}

/// American doubles crediting: both partners share wins and points.
#[test]
fn test_american_doubles_standings() {
    let mut bracket = Bracket::generate(ScheduleKind::AmericanDoubles, roster(8), false);
    let first = bracket.rounds()[0].matches[0];
    bracket.record_result(first, Outcome::Win(Side::Left)).unwrap();
    bracket.set_scores(first, 21, 17).unwrap();

    let table = bracket.standings();
    let winners: Vec<&str> = table
        .iter()
        .filter(|record| record.wins == 1)
        .map(|record| record.name.as_str())
        .collect();
    assert_eq!(winners, ["P3", "P4"]);
    assert!(table[..2].iter().all(|record| record.points_difference == 4));
}

/// Brackets survive a JSON round trip, links included.
#[test]
fn test_snapshot_reload() {
    let mut bracket = Bracket::generate(ScheduleKind::DoubleElimination, roster(5), true);
    bracket.record_result(MatchId::new(4), Outcome::Win(Side::Right)).unwrap();

    let mut restored = Bracket::from_json(&bracket.to_json().unwrap()).unwrap();
    assert_eq!(restored.matches(), bracket.matches());
    assert_eq!(restored.rounds(), bracket.rounds());
    assert_eq!(restored.losers(), bracket.losers());

    play_out(&mut restored, |_| Side::Left);
    assert!(restored.is_complete());
    assert!(restored.champion().is_some());
}

/// Hand-edited snapshots with broken links are rejected.
#[test]
fn test_snapshot_with_dangling_link() {
    let bracket = Bracket::generate(ScheduleKind::SingleElimination, roster(4), false);
    let json = bracket
        .to_json()
        .unwrap()
        .replace("\"prev_left\":1", "\"prev_left\":40");

    let err = Bracket::from_json(&json).unwrap_err();
    assert!(matches!(err, BracketError::InvalidDefinition(msg) if msg.contains("#40")));
}

proptest! {
    /// Every pair meets exactly once in a round robin.
    #[test]
    fn prop_round_robin_pairs_meet_once(count in 2usize..=24) {
        let bracket = Bracket::generate(ScheduleKind::RoundRobin, roster(count), false);
        let pairs = pairings(&bracket);
        let unique: HashSet<_> = pairs.iter().cloned().collect();

        prop_assert_eq!(pairs.len(), count * (count - 1) / 2);
        prop_assert_eq!(unique.len(), pairs.len());
    }

    /// Any sequence of results plays a double elimination pool to the end.
    #[test]
    fn prop_double_elimination_completes(
        count in 2usize..=20,
        picks in proptest::collection::vec(any::<bool>(), 80),
    ) {
        let mut bracket = Bracket::generate(ScheduleKind::DoubleElimination, roster(count), false);
        play_out(&mut bracket, |id| {
            if picks[id.get() as usize % picks.len()] { Side::Left } else { Side::Right }
        });

        prop_assert!(bracket.is_complete());
        prop_assert!(bracket.champion().is_some());
        prop_assert!(bracket.validate().is_ok());

        // No second chances after two losses, and nobody but the
        // champion leaves without one
        let champion = bracket.champion().map(|e| e.lead.clone());
        for record in bracket.standings() {
            prop_assert!(record.losses <= 2);
            if Some(&record.participant_id) == champion.as_ref() {
                prop_assert!(record.losses <= 1);
            } else {
                prop_assert!(record.losses >= 1);
            }
        }
    }

    /// Flipping any decided result never leaves a winner on an empty side.
    #[test]
    fn prop_flipping_results_stays_consistent(
        count in 2usize..=16,
        flip in 1u32..=64,
    ) {
        let mut bracket = Bracket::generate(ScheduleKind::DoubleElimination, roster(count), false);
        play_out(&mut bracket, |_| Side::Left);

        let id = MatchId::new((flip - 1) % bracket.match_count() as u32 + 1);
        bracket.record_result(id, Outcome::Win(Side::Right)).unwrap();
        prop_assert!(bracket.validate().is_ok());

        bracket.reset(id).unwrap();
        prop_assert!(bracket.validate().is_ok());
        prop_assert!(!bracket.get(id).unwrap().is_decided() || bracket.get(id).unwrap().is_bye);
    }
}
