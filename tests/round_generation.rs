//! Integration tests for round generation: sit-outs, court filling, partnerships, freshness.

use court_rotation::{
    CollectedAlerts, Court, EngineError, EngineOptions, PartnershipConstraint, Player, PlayerId,
    PlayerStats, RoundAssignment, RoundEngine, Session, SitOutStrategy,
};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

fn players(n: usize) -> Vec<Player> {
    (0..n).map(|i| Player::new(format!("P{i}"))).collect()
}

fn courts(n: usize) -> Vec<Court> {
    (0..n).map(|i| Court::new(format!("Court {}", i + 1))).collect()
}

fn engine(session: &Session, seed: u64) -> RoundEngine<StdRng> {
    engine_with(session, seed, SitOutStrategy::FairWeighted)
}

fn engine_with(session: &Session, seed: u64, strategy: SitOutStrategy) -> RoundEngine<StdRng> {
    let options = EngineOptions {
        strategy,
        ..EngineOptions::default()
    };
    RoundEngine::with_rng(session, options, StdRng::seed_from_u64(seed)).unwrap()
}

/// Count invariant plus: four distinct players per game, nobody used twice.
fn assert_well_formed(assignment: &RoundAssignment, available: usize) {
    assert_eq!(
        4 * assignment.game_assignments.len() + assignment.sitting_out_ids.len(),
        available
    );
    let mut seen = HashSet::new();
    for id in assignment.playing_ids().chain(assignment.sitting_out_ids.iter().copied()) {
        assert!(seen.insert(id), "player {id} appears twice");
    }
}

/// Every available enforced pair is on one team together, or sits out together.
fn assert_pairs_intact(assignment: &RoundAssignment, pairs: &[(PlayerId, PlayerId)]) {
    for &(a, b) in pairs {
        let sitting = &assignment.sitting_out_ids;
        let both_out = sitting.contains(&a) && sitting.contains(&b);
        let same_team = assignment.game_assignments.iter().any(|g| {
            [g.serve_team, g.receive_team]
                .iter()
                .any(|t| t.contains(a) && t.contains(b))
        });
        assert!(both_out || same_team, "pair split: {:?}", assignment);
    }
}

/// Score every game 11-5 for the serve team, apply stats, record the round.
fn play_round(
    session: &mut Session,
    engine: &mut RoundEngine<StdRng>,
    assignment: RoundAssignment,
) {
    let mut round = assignment.into_round(engine.round_number());
    for game in &mut round.games {
        game.record_score(11, 5);
    }
    let stats = engine.update_stats_for_round(&round).unwrap();
    session.record_round(round).unwrap();
    session.store_stats(stats).unwrap();
}

#[test]
fn eight_players_fill_two_courts() {
    let session = Session::live_with(players(8), courts(2), PartnershipConstraint::default());
    let assignment = engine(&session, 1).generate_round_assignment(None);

    assert_eq!(assignment.game_assignments.len(), 2);
    assert!(assignment.sitting_out_ids.is_empty());
    assert_well_formed(&assignment, 8);
    let used: HashSet<PlayerId> = assignment.playing_ids().collect();
    let all: HashSet<PlayerId> = session.players.iter().map(|p| p.id).collect();
    assert_eq!(used, all);
}

#[test]
fn rated_court_without_four_eligible_players_is_skipped() {
    let mut roster: Vec<Player> = (0..2)
        .map(|i| Player::rated(format!("Strong {i}"), 4.5))
        .collect();
    roster.extend((0..6).map(|i| Player::rated(format!("Club {i}"), 3.0)));
    let top = Court::rated("Top", 4.0);
    let open = Court::new("Open");
    let court_list = vec![top, open.clone()];
    let session = Session::live_with(roster, court_list, PartnershipConstraint::default());

    for seed in 0..10 {
        let assignment = engine(&session, seed).generate_round_assignment(None);

        assert_eq!(assignment.game_assignments.len(), 1);
        assert_eq!(assignment.game_assignments[0].court_id, open.id);
        assert_eq!(assignment.sitting_out_ids.len(), 4);
        assert_well_formed(&assignment, 8);
    }
}

#[test]
fn ten_players_on_two_courts_leave_two_sitting_out() {
    let session = Session::live_with(players(10), courts(2), PartnershipConstraint::default());
    let assignment = engine(&session, 3).generate_round_assignment(None);

    assert_eq!(assignment.game_assignments.len(), 2);
    assert_eq!(assignment.sitting_out_ids.len(), 2);
    assert_well_formed(&assignment, 10);
}

#[test]
fn fixed_partners_share_a_team() {
    let roster = players(4);
    let (a, b) = (roster[0].id, roster[1].id);
    let mut partnerships = PartnershipConstraint::new(true);
    partnerships.add(a, b);
    let session = Session::live_with(roster, courts(1), partnerships);

    for seed in 0..20 {
        let assignment = engine(&session, seed).generate_round_assignment(None);

        assert_eq!(assignment.game_assignments.len(), 1);
        let game = assignment.game_assignments[0];
        assert!(
            [game.serve_team, game.receive_team]
                .iter()
                .any(|t| t.contains(a) && t.contains(b)),
            "seed {seed}: {game:?}"
        );
    }
}

#[test]
fn all_players_excluded_gives_empty_round() {
    let mut session = Session::live_with(players(8), courts(2), PartnershipConstraint::default());
    let ids: Vec<PlayerId> = session.players.iter().map(|p| p.id).collect();
    for id in ids {
        session.exclude_player(id).unwrap();
    }

    let assignment = engine(&session, 4).generate_round_assignment(None);

    assert!(assignment.is_empty());
    assert!(assignment.sitting_out_ids.is_empty());
}

#[test]
fn too_few_players_all_sit_out() {
    let session = Session::live_with(players(3), courts(1), PartnershipConstraint::default());
    let assignment = engine(&session, 5).generate_round_assignment(None);

    assert!(assignment.is_empty());
    assert_eq!(assignment.sitting_out_ids.len(), 3);
}

#[test]
fn kept_candidate_is_the_freshest_trial() {
    let mut session = Session::live_with(players(12), courts(2), PartnershipConstraint::default());
    for seed in 0..3 {
        let mut e = engine(&session, seed);
        let assignment = e.generate_round_assignment(None);
        play_round(&mut session, &mut e, assignment);
    }

    for seed in 10..20 {
        let result = engine(&session, seed).optimize_round(None);

        assert_eq!(result.candidate_scores.len(), 3);
        assert!(result.candidate_scores.iter().all(|&s| result.best.score <= s));
        assert_eq!(Some(&result.best.score), result.candidate_scores.iter().min());
    }
}

#[test]
fn players_on_rated_courts_meet_the_minimum() {
    let mut roster: Vec<Player> = Vec::new();
    for (i, rating) in [5.0, 4.5, 4.2, 4.0, 3.8, 3.5, 3.2, 3.0, 2.5, 2.0].iter().enumerate() {
        roster.push(Player::rated(format!("R{i}"), *rating));
    }
    roster.extend(players(4));
    let rated = vec![Court::rated("A", 4.0), Court::rated("B", 3.0), Court::new("C")];
    let session =
        Session::live_with(roster.clone(), rated.clone(), PartnershipConstraint::default());

    for seed in 0..30 {
        let assignment = engine(&session, seed).generate_round_assignment(None);
        assert_well_formed(&assignment, roster.len());
        for game in &assignment.game_assignments {
            let court = rated.iter().find(|c| c.id == game.court_id).unwrap();
            for id in game.player_ids() {
                let player = roster.iter().find(|p| p.id == id).unwrap();
                assert!(
                    player.meets_rating(court.minimum_rating),
                    "seed {seed}: {} on {}",
                    player.name,
                    court.name
                );
            }
        }
    }
}

#[test]
fn enforced_partnerships_hold_across_rounds_and_strategies() {
    let strategies = [
        SitOutStrategy::FairWeighted,
        SitOutStrategy::Lottery,
        SitOutStrategy::WholeUnits,
    ];
    for rated in [false, true] {
        for strategy in strategies {
            // Rated run: P2, P3 and P9 are unrated, so the second pair never plays Top.
            let roster: Vec<Player> = (0..10)
                .map(|i| match i {
                    2 | 3 | 9 => Player::new(format!("P{i}")),
                    _ if rated => Player::rated(format!("P{i}"), 4.0),
                    _ => Player::new(format!("P{i}")),
                })
                .collect();
            let court_list = if rated {
                vec![Court::rated("Top", 3.0), Court::new("Open")]
            } else {
                courts(2)
            };
            let pairs = vec![(roster[0].id, roster[1].id), (roster[2].id, roster[3].id)];
            let mut partnerships = PartnershipConstraint::new(true);
            for &(a, b) in &pairs {
                partnerships.add(a, b);
            }
            let mut session = Session::live_with(roster, court_list, partnerships);

            for seed in 0..8 {
                let mut e = engine_with(&session, seed, strategy);
                let assignment = e.generate_round_assignment(None);
                assert_well_formed(&assignment, 10);
                assert_eq!(assignment.game_assignments.len(), 2, "{strategy:?}, rated {rated}");
                assert_pairs_intact(&assignment, &pairs);
                play_round(&mut session, &mut e, assignment);
            }
        }
    }
}

#[test]
fn enforced_pair_stays_together_when_behind_on_a_rated_court() {
    let mut roster: Vec<Player> = (0..5).map(|i| Player::rated(format!("R{i}"), 4.0)).collect();
    roster.extend((0..3).map(|i| Player::new(format!("U{i}"))));
    let pair = (roster[0].id, roster[1].id);
    let top = Court::rated("Top", 3.0);
    let mut partnerships = PartnershipConstraint::new(true);
    partnerships.add(pair.0, pair.1);
    let court_list = vec![top.clone(), Court::new("Open")];
    let mut session = Session::live_with(roster, court_list, partnerships);
    // The pair has played Top more than the other rated players, so neither opens the game.
    let stats = [pair.0, pair.1]
        .into_iter()
        .map(|id| {
            let mut stats = PlayerStats::new(id);
            stats.games_on_court.insert(top.id, 2);
            stats
        })
        .collect();
    session.store_stats(stats).unwrap();

    for seed in 0..200 {
        let assignment = engine(&session, seed).generate_round_assignment(None);

        assert_eq!(assignment.game_assignments.len(), 2, "seed {seed}");
        assert_well_formed(&assignment, 8);
        assert_pairs_intact(&assignment, &[pair]);
    }
}

#[test]
fn enforced_pair_drops_below_a_court_only_one_partner_qualifies_for() {
    let a = Player::rated("A", 4.5);
    let b = Player::rated("B", 3.0);
    let mut roster = vec![a.clone(), b.clone()];
    roster.extend((0..3).map(|i| Player::rated(format!("High {i}"), 4.5)));
    roster.extend((0..3).map(|i| Player::rated(format!("Mid {i}"), 3.0)));
    let top = Court::rated("Top", 4.0);
    let mut partnerships = PartnershipConstraint::new(true);
    partnerships.add(a.id, b.id);
    let court_list = vec![top.clone(), Court::new("Open")];
    let session = Session::live_with(roster, court_list, partnerships);

    for seed in 0..50 {
        let assignment = engine(&session, seed).generate_round_assignment(None);

        // Only three players qualify for Top once A stays with B.
        assert_eq!(assignment.game_assignments.len(), 1, "seed {seed}");
        assert!(assignment.game_assignments.iter().all(|g| g.court_id != top.id));
        assert_well_formed(&assignment, 8);
        assert_pairs_intact(&assignment, &[(a.id, b.id)]);
    }
}

#[test]
fn paused_player_is_skipped_until_included_again() {
    let mut session = Session::live_with(players(5), courts(1), PartnershipConstraint::default());
    let paused = session.players[4].id;
    session.exclude_player(paused).unwrap();

    let assignment = engine(&session, 1).generate_round_assignment(None);
    assert_well_formed(&assignment, 4);
    assert!(assignment.sitting_out_ids.is_empty());
    assert!(assignment.playing_ids().all(|id| id != paused));

    session.include_player(paused).unwrap();
    let assignment = engine(&session, 1).generate_round_assignment(None);
    assert_eq!(session.available_players().len(), 5);
    assert_well_formed(&assignment, 5);
    assert_eq!(assignment.sitting_out_ids.len(), 1);

    let stranger = Player::new("Stranger").id;
    assert_eq!(session.include_player(stranger), Err(EngineError::PlayerNotFound(stranger)));
}

#[test]
fn everyone_sits_out_once_before_anyone_sits_twice() {
    let mut session = Session::live_with(players(10), courts(2), PartnershipConstraint::default());

    for seed in 0..5 {
        let before = session.live().unwrap().player_stats.clone();
        let mut e = engine(&session, seed);
        let assignment = e.generate_round_assignment(None);
        let sitting = assignment.sitting_out_ids.clone();
        play_round(&mut session, &mut e, assignment);

        let after = &session.live().unwrap().player_stats;
        for stats in after {
            let prior = before
                .iter()
                .find(|s| s.player_id == stats.player_id)
                .map_or(0, |s| s.games_sat_out);
            let expected = prior + u32::from(sitting.contains(&stats.player_id));
            assert_eq!(stats.games_sat_out, expected);
        }
    }

    let stats = &session.live().unwrap().player_stats;
    assert_eq!(stats.len(), 10);
    assert!(stats.iter().all(|s| s.games_sat_out == 1 && s.games_played == 4));
}

#[test]
fn seeding_stats_twice_gives_identical_maps() {
    let mut session = Session::live_with(players(9), courts(2), PartnershipConstraint::default());
    let mut e = engine(&session, 8);
    let assignment = e.generate_round_assignment(None);
    play_round(&mut session, &mut e, assignment);

    let first = engine(&session, 1).player_stats();
    let second = engine(&session, 2).player_stats();

    assert_eq!(first, second);
    assert_eq!(first.len(), 9);
}

#[test]
fn same_seed_gives_same_round() {
    let roster = players(11);
    let mut partnerships = PartnershipConstraint::new(false);
    partnerships.add(roster[3].id, roster[7].id);
    let session = Session::live_with(roster, courts(2), partnerships);

    let first = engine(&session, 42).generate_round_assignment(None);
    let second = engine(&session, 42).generate_round_assignment(None);

    assert_eq!(first, second);
}

#[test]
fn forced_sit_outs_bypass_selection() {
    let session = Session::live_with(players(10), courts(2), PartnershipConstraint::default());
    let forced = vec![session.players[0].id, session.players[9].id];

    let assignment = engine(&session, 6).generate_round_assignment(Some(&forced));

    assert_eq!(assignment.sitting_out_ids, forced);
    assert_eq!(assignment.game_assignments.len(), 2);
}

#[test]
fn unknown_partner_is_reported_and_ignored() {
    let roster = players(8);
    let mut partnerships = PartnershipConstraint::new(true);
    partnerships.add(roster[0].id, Player::new("Ghost").id);
    let session = Session::live_with(roster, courts(2), partnerships);
    let alerts = CollectedAlerts::new();

    let assignment = engine(&session, 2)
        .with_alerts(alerts.clone())
        .generate_round_assignment(None);

    assert_eq!(assignment.game_assignments.len(), 2);
    assert_eq!(alerts.messages().len(), 1);
}

#[test]
fn engine_requires_a_live_session() {
    let mut session = Session::new("Thursday doubles");
    session.add_player(Player::new("Ann")).unwrap();

    let result = RoundEngine::new(&session, EngineOptions::default());

    assert!(matches!(result, Err(EngineError::SessionNotLive)));
}

#[test]
fn inactive_courts_are_not_filled() {
    let mut court_list = courts(2);
    court_list[1].is_active = false;
    let session = Session::live_with(players(8), court_list, PartnershipConstraint::default());

    let assignment = engine(&session, 0).generate_round_assignment(None);

    assert_eq!(assignment.game_assignments.len(), 1);
    assert_eq!(assignment.sitting_out_ids.len(), 4);
}
