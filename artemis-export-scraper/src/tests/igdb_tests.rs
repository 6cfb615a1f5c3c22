use super::*;

fn game(name: &str) -> IgdbGame {
    IgdbGame {
        name: name.to_string(),
        summary: None,
        storyline: None,
        total_rating: None,
        first_release_date: None,
        genres: Vec::new(),
        cover: None,
        artworks: Vec::new(),
        screenshots: Vec::new(),
        involved_companies: Vec::new(),
        game_modes: Vec::new(),
        player_perspectives: Vec::new(),
    }
}

#[test]
fn test_best_match_prefers_exact() {
    let games = vec![game("Halo: Combat Evolved Anniversary"), game("halo")];
    let best = best_match("Halo", &games).unwrap();
    assert_eq!(best.name, "halo");
}

#[test]
fn test_best_match_rejects_below_threshold() {
    let games = vec![game("Completely Unrelated Title")];
    assert!(best_match("Halo", &games).is_none());
}

#[test]
fn test_best_match_picks_highest_similarity() {
    let games = vec![game("Rocket League\u{ae}"), game("Rocket Racing League Pro")];
    let best = best_match("Rocket League", &games).unwrap();
    assert_eq!(best.name, "Rocket League\u{ae}");
}

#[test]
fn test_build_match_metadata_mapping() {
    let mut g = game("Halo");
    g.summary = Some("A shooter.".to_string());
    g.total_rating = Some(86.6);
    // 2001-11-15 00:00:00 UTC
    g.first_release_date = Some(1_005_782_400);
    g.genres = vec![Named {
        name: "Shooter".to_string(),
    }];
    g.involved_companies = vec![
        InvolvedCompany {
            developer: true,
            publisher: false,
            company: Named {
                name: "Bungie".to_string(),
            },
        },
        InvolvedCompany {
            developer: false,
            publisher: true,
            company: Named {
                name: "Microsoft".to_string(),
            },
        },
    ];
    g.game_modes = vec![Named {
        name: "Single player".to_string(),
    }];
    g.player_perspectives = vec![
        Named {
            name: "First person".to_string(),
        },
        Named {
            name: "Single player".to_string(),
        },
    ];

    let matched = build_match(&g);
    let meta = &matched.metadata;
    assert_eq!(meta.summary.as_deref(), Some("A shooter."));
    assert_eq!(meta.rating, Some(87));
    assert_eq!(meta.release_date.as_deref(), Some("2001-11-15"));
    assert_eq!(meta.developers, vec!["Bungie"]);
    assert_eq!(meta.publishers, vec!["Microsoft"]);
    // Tags deduplicate across modes and perspectives.
    assert_eq!(meta.tags, vec!["Single player", "First person"]);
}

#[test]
fn test_build_match_image_candidates() {
    let mut g = game("Halo");
    g.cover = Some(ImageRef {
        image_id: "cov1".to_string(),
    });
    g.screenshots = vec![
        ImageRef {
            image_id: "shot1".to_string(),
        },
        ImageRef {
            image_id: "shot2".to_string(),
        },
    ];
    g.artworks = vec![ImageRef {
        image_id: "art1".to_string(),
    }];

    let matched = build_match(&g);
    assert_eq!(
        matched.images,
        vec![
            (
                AssetKind::BoxFront,
                "https://images.igdb.com/igdb/image/upload/t_cover_big/cov1.jpg".to_string()
            ),
            (
                AssetKind::Screenshot,
                "https://images.igdb.com/igdb/image/upload/t_screenshot_big/shot1.jpg".to_string()
            ),
            (
                AssetKind::Background,
                "https://images.igdb.com/igdb/image/upload/t_1080p/art1.jpg".to_string()
            ),
        ]
    );
}

#[test]
fn test_rating_percent_clamps() {
    assert_eq!(rating_percent(86.6), 87);
    assert_eq!(rating_percent(-3.0), 0);
    assert_eq!(rating_percent(140.0), 100);
}

#[test]
fn test_token_cell_generation_guard() {
    let cell = TokenCell {
        token: Some("t1".to_string()),
        generation: 0,
        grant_failed: false,
    };
    // A caller that read generation 0 should refresh...
    assert!(cell.is_current(0));
    // ...but one holding an older generation sees a newer token already.
    let refreshed = TokenCell {
        token: Some("t2".to_string()),
        generation: 1,
        grant_failed: false,
    };
    assert!(!refreshed.is_current(0));
}

#[tokio::test]
async fn test_failed_grant_short_circuits_later_callers() {
    let client = IgdbClient::new("id".to_string(), "secret".to_string()).unwrap();
    client.token.lock().await.grant_failed = true;

    let err = client.current_token().await.unwrap_err();
    assert!(matches!(err, EnrichError::Token(_)));

    let err = client.refresh_token(0).await.unwrap_err();
    assert!(matches!(err, EnrichError::Token(_)));
}

#[tokio::test]
async fn test_search_metadata_returns_memoized_match() {
    let client = IgdbClient::new("id".to_string(), "secret".to_string()).unwrap();
    let cached = IgdbMatch {
        metadata: GameMetadata {
            summary: Some("Cached.".to_string()),
            ..Default::default()
        },
        images: Vec::new(),
    };
    client
        .match_cache
        .lock()
        .await
        .insert("Halo".to_string(), Some(cached));

    let matched = client.search_metadata("Halo").await.unwrap().unwrap();
    assert_eq!(matched.metadata.summary.as_deref(), Some("Cached."));

    client
        .match_cache
        .lock()
        .await
        .insert("Unknown".to_string(), None);
    assert!(client.search_metadata("Unknown").await.unwrap().is_none());
}
