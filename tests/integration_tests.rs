// Integration tests for the Sesh matching engine

use sesh_match::core::MatchEngine;
use sesh_match::models::{
    Candidate, LocationPolicy, MatchRequest, MatchResults, Preference, RolePreference, SkillEntry,
};

fn create_candidate(
    id: &str,
    name: &str,
    location: &str,
    traits: &[&str],
    skills: &[(&str, Option<i64>)],
) -> Candidate {
    Candidate {
        id: id.to_string(),
        name: name.to_string(),
        location: Some(location.to_string()),
        traits: traits.iter().map(|t| t.to_string()).collect(),
        skills: skills
            .iter()
            .map(|(skill, years)| SkillEntry {
                name: skill.to_string(),
                years_experience: *years,
            })
            .collect(),
        years_experience: None,
    }
}

/// The three-musician pool from the product's demo data.
fn trio_pool() -> Vec<Candidate> {
    vec![
        create_candidate(
            "1",
            "Ana",
            "Lisboa",
            &["Punctual", "Creative", "Rock"],
            &[("Guitar", Some(4))],
        ),
        create_candidate(
            "2",
            "Bruno",
            "Porto",
            &["Improviser", "Jazz", "Creative"],
            &[("Saxophone", Some(6))],
        ),
        create_candidate(
            "3",
            "Carla",
            "Lisboa",
            &["Punctual", "Pop", "Vocalist"],
            &[("Voice", Some(2))],
        ),
    ]
}

/// Five musicians covering a four-piece band plus a spare keyboardist.
fn band_pool() -> Vec<Candidate> {
    vec![
        create_candidate("d", "Diana", "Lisboa", &["Punctual", "Rock"], &[("Drums", Some(5))]),
        create_candidate("b", "Bea", "Lisboa", &["Punctual", "Rock"], &[("Bass", Some(4))]),
        create_candidate("g", "Gil", "Lisboa", &["Punctual", "Rock"], &[("Guitar", Some(6))]),
        create_candidate("v", "Vera", "Lisboa", &["Punctual", "Rock"], &[("Voice", Some(3))]),
        create_candidate("k", "Kiko", "Lisboa", &["Punctual", "Rock"], &[("Keyboard", Some(7))]),
    ]
}

fn individual_results(engine: &MatchEngine, pool: &[Candidate], prefs: &Preference, limit: usize) -> Vec<sesh_match::models::RankedCandidate> {
    match engine.solve(pool, prefs, limit).results {
        MatchResults::Individual(results) => results,
        MatchResults::Band(_) => panic!("expected individual results"),
    }
}

fn band_results(engine: &MatchEngine, pool: &[Candidate], prefs: &Preference, limit: usize) -> Vec<sesh_match::models::BandResult> {
    match engine.solve(pool, prefs, limit).results {
        MatchResults::Band(results) => results,
        MatchResults::Individual(_) => panic!("expected band results"),
    }
}

#[test]
fn test_guitarist_request_returns_exact_match_first() {
    let engine = MatchEngine::with_defaults();
    let prefs = Preference {
        skill: Some("Guitar".to_string()),
        years_experience: Some(3),
        location: Some("Lisboa".to_string()),
        traits: vec![
            "Punctual".to_string(),
            "Rock".to_string(),
            "Creative".to_string(),
        ],
        ..Default::default()
    };

    let results = individual_results(&engine, &trio_pool(), &prefs, 5);

    assert!(!results.is_empty());
    assert_eq!(results[0].id, "1");
    assert_eq!(results[0].name, "Ana");
    assert!(results[0].exact);

    // 4.0 skill + 0.75 * 2.5 years + 2.5 location + 3.5 traits + 0.5 bonus
    assert!((results[0].score - 12.375).abs() < 1e-9);
    assert_eq!(results[0].diagnostics.years_delta, Some(1));
}

#[test]
fn test_absent_instrument_yields_no_results() {
    let engine = MatchEngine::with_defaults();
    let prefs = Preference {
        skill: Some("Violin".to_string()),
        ..Default::default()
    };

    let results = individual_results(&engine, &trio_pool(), &prefs, 5);

    assert!(results.is_empty());
}

#[test]
fn test_four_piece_band_assembles_exactly() {
    let engine = MatchEngine::with_defaults();
    let roles = vec![
        "Drums".to_string(),
        "Bass".to_string(),
        "Guitar".to_string(),
        "Vocals".to_string(),
    ];
    let prefs = Preference {
        location: Some("Lisboa".to_string()),
        traits: vec!["Punctual".to_string(), "Rock".to_string()],
        roles: Some(roles.clone()),
        location_policy: LocationPolicy::AllSame,
        ..Default::default()
    };

    let results = band_results(&engine, &band_pool(), &prefs, 1);

    assert_eq!(results.len(), 1);
    let band = &results[0];
    assert!(band.exact);
    assert_eq!(band.roles, roles);
    assert_eq!(band.location_policy, LocationPolicy::AllSame);
    assert_eq!(band.members.len(), 4);

    // Members come back in requested role order with distinct ids.
    let member_roles: Vec<&str> = band.members.iter().map(|m| m.role.as_str()).collect();
    assert_eq!(member_roles, vec!["Drums", "Bass", "Guitar", "Vocals"]);
    let mut ids: Vec<&str> = band.members.iter().map(|m| m.id.as_str()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 4);
}

#[test]
fn test_band_falls_back_to_relaxed_when_one_role_cannot_be_strict() {
    let engine = MatchEngine::with_defaults();
    let mut pool = band_pool();
    // The only guitarist sits in a near-miss city and his years are off by
    // more than the relaxation window.
    pool[2].location = Some("Lisbon".to_string());
    let mut prefs = Preference {
        location: Some("Lisboa".to_string()),
        roles: Some(vec![
            "Drums".to_string(),
            "Bass".to_string(),
            "Guitar".to_string(),
            "Vocals".to_string(),
        ]),
        location_policy: LocationPolicy::AllSame,
        ..Default::default()
    };
    prefs.role_overrides.insert(
        "guitar".to_string(),
        RolePreference {
            years_experience: Some(1),
            traits: None,
            location: None,
        },
    );

    let results = band_results(&engine, &pool, &prefs, 1);

    assert_eq!(results.len(), 1);
    let band = &results[0];
    assert!(!band.exact);
    assert_eq!(band.members.len(), 4);
    assert!(band.members.iter().any(|m| m.id == "g"));
}

#[test]
fn test_single_results_ordered_and_truncated() {
    let engine = MatchEngine::with_defaults();
    let pool: Vec<Candidate> = (1..=6)
        .map(|years| {
            create_candidate(
                &years.to_string(),
                &format!("Guitarist {}", years),
                "Lisboa",
                &[],
                &[("Guitar", Some(years as i64))],
            )
        })
        .collect();
    let prefs = Preference {
        skill: Some("Guitar".to_string()),
        years_experience: Some(3),
        ..Default::default()
    };

    let results = individual_results(&engine, &pool, &prefs, 4);

    // Strict mode keeps the four players meeting the floor; closest first.
    assert_eq!(results.len(), 4);
    let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["3", "4", "5", "6"]);
    for pair in results.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
    assert!(results.iter().all(|r| r.exact));
}

#[test]
fn test_relaxed_results_only_when_strict_is_empty() {
    let engine = MatchEngine::with_defaults();
    let pool = vec![create_candidate(
        "1",
        "Ana",
        "Lisboa",
        &[],
        &[("Guitar", Some(2))],
    )];
    let prefs = Preference {
        skill: Some("Guitar".to_string()),
        years_experience: Some(4),
        ..Default::default()
    };

    let results = individual_results(&engine, &pool, &prefs, 5);

    assert_eq!(results.len(), 1);
    assert!(!results[0].exact);
}

#[test]
fn test_band_members_never_repeat_across_roles() {
    let engine = MatchEngine::with_defaults();
    // One multi-instrumentalist dominates both roles.
    let pool = vec![
        create_candidate(
            "multi",
            "Multi",
            "Lisboa",
            &[],
            &[("Guitar", Some(9)), ("Drums", Some(9))],
        ),
        create_candidate("g", "Gil", "Lisboa", &[], &[("Guitar", Some(2))]),
        create_candidate("d", "Diana", "Lisboa", &[], &[("Drums", Some(2))]),
    ];
    let prefs = Preference {
        roles: Some(vec!["Guitar".to_string(), "Drums".to_string()]),
        ..Default::default()
    };

    let results = band_results(&engine, &pool, &prefs, 3);

    assert!(!results.is_empty());
    for band in &results {
        let mut ids: Vec<&str> = band.members.iter().map(|m| m.id.as_str()).collect();
        ids.sort();
        let before = ids.len();
        ids.dedup();
        assert_eq!(ids.len(), before, "band repeats a candidate id");
        for member in &band.members {
            assert!(band.roles.contains(&member.role));
        }
    }
}

#[test]
fn test_request_decodes_from_wire_format() {
    let payload = r#"{
        "candidates": [
            {
                "id": "1",
                "name": "Ana",
                "location": "Lisboa",
                "traits": ["Punctual", "Rock"],
                "skills": [{"name": "Guitarra", "yearsExperience": "4"}]
            }
        ],
        "preferences": {
            "skill": "Guitar",
            "yearsExperience": 3,
            "location": "Lisboa"
        },
        "maxResults": 5
    }"#;

    let request: MatchRequest = serde_json::from_str(payload).unwrap();
    let engine = MatchEngine::with_defaults();
    let results = individual_results(&engine, &request.candidates, &request.preferences, 5);

    assert_eq!(results.len(), 1);
    assert!(results[0].exact);
    let matched = results[0].diagnostics.matched_skill.as_ref().unwrap();
    assert_eq!(matched.name, "Guitarra");
    assert_eq!(matched.years_experience, Some(4));
}

#[test]
fn test_response_serializes_with_wire_field_names() {
    let engine = MatchEngine::with_defaults();
    let prefs = Preference {
        skill: Some("Guitar".to_string()),
        years_experience: Some(3),
        ..Default::default()
    };
    let report = engine.solve(&trio_pool(), &prefs, 5);
    let response = sesh_match::models::MatchResponse {
        results: report.results,
        total_candidates: report.total_candidates,
    };

    let value = serde_json::to_value(&response).unwrap();

    assert_eq!(value["totalCandidates"], 3);
    let first = &value["results"][0];
    assert_eq!(first["id"], "1");
    assert_eq!(first["exact"], true);
    assert!(first["diagnostics"]["skillSimilarity"].is_number());
    assert!(first["diagnostics"]["yearsDelta"].is_number());
}

#[test]
fn test_malformed_years_degrade_without_failing() {
    let engine = MatchEngine::with_defaults();
    let payload = r#"{
        "candidates": [
            {
                "id": "1",
                "name": "Ana",
                "location": "Lisboa",
                "skills": [{"name": "Guitar", "yearsExperience": "unknown"}]
            }
        ],
        "preferences": {"skill": "Guitar", "yearsExperience": 3}
    }"#;

    let request: MatchRequest = serde_json::from_str(payload).unwrap();
    let results = individual_results(&engine, &request.candidates, &request.preferences, 5);

    // Years never resolve, so the candidate fails that dimension in both
    // modes; the call itself still succeeds.
    assert!(results.is_empty());
}
