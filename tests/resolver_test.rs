mod common;

use std::collections::HashSet;

use common::{FakeCatalog, track};
use playlist_genius::{
    playlist::{
        EraRange,
        resolver::{
            Bucket, Confidence, FALLBACK_TARGET, SearchStrategy, broad_search, classify,
            fallback_terms, resolve_all, resolve_suggestion, select,
        },
    },
    types::SongSuggestion,
};

fn suggestion(title: &str, artist: &str, year: Option<i32>) -> SongSuggestion {
    SongSuggestion {
        title: title.to_string(),
        artist: artist.to_string(),
        year,
        reason: Some(format!("{} just works", title)),
    }
}

#[test]
fn test_classify_with_era() {
    let era = Some(EraRange::new(1980, 1983));

    assert_eq!(classify(Some(1981), None, era), Bucket::Strict);
    assert_eq!(classify(Some(1983), Some(1999), era), Bucket::Strict);
    assert_eq!(classify(Some(1985), None, era), Bucket::Loose);
    assert_eq!(classify(Some(1978), None, era), Bucket::Loose);
    assert_eq!(classify(Some(1990), Some(1990), era), Bucket::Rejected);
    assert_eq!(classify(None, Some(1981), era), Bucket::Rejected);
}

#[test]
fn test_classify_with_suggested_year() {
    assert_eq!(classify(Some(1981), Some(1981), None), Bucket::Strict);
    assert_eq!(classify(Some(1982), Some(1981), None), Bucket::Strict);
    assert_eq!(classify(Some(1986), Some(1981), None), Bucket::Loose);
    assert_eq!(classify(Some(1987), Some(1981), None), Bucket::Rejected);
}

#[test]
fn test_classify_without_year_information() {
    assert_eq!(classify(None, None, None), Bucket::Loose);
    assert_eq!(classify(None, Some(1981), None), Bucket::Loose);
    assert_eq!(classify(Some(1981), None, None), Bucket::Rejected);
}

#[test]
fn test_select_prefers_strict_over_earlier_loose() {
    let tracks = vec![
        track("remaster", "Song", "Artist", Some("1985-01-01")),
        track("original", "Song", "Artist", Some("1981-06-01")),
    ];

    let (picked, confidence) =
        select(&tracks, None, Some(EraRange::new(1980, 1983))).expect("a match");
    assert_eq!(picked.id, "original");
    assert_eq!(confidence, Confidence::Strict);
}

#[test]
fn test_select_year_before_era_only_without_strict_hit() {
    let era = Some(EraRange::new(1980, 1983));
    let early = track("early", "Song", "Artist", Some("1979-12-01"));
    let inside = track("inside", "Song", "Artist", Some("1980-02-01"));

    let only_early = vec![early.clone()];
    let (picked, confidence) = select(&only_early, None, era).expect("a match");
    assert_eq!(picked.id, "early");
    assert_eq!(confidence, Confidence::Loose);

    let both = vec![early, inside];
    let (picked, confidence) = select(&both, None, era).expect("a match");
    assert_eq!(picked.id, "inside");
    assert_eq!(confidence, Confidence::Strict);
}

#[test]
fn test_select_treats_placeholder_date_as_unknown() {
    let tracks = vec![track("placeholder", "Song", "Artist", Some("0000"))];

    let (picked, confidence) = select(&tracks, Some(1981), None).expect("a match");
    assert_eq!(picked.id, "placeholder");
    assert_eq!(confidence, Confidence::Loose);

    let (_, confidence) = select(&tracks, None, None).expect("a match");
    assert_eq!(confidence, Confidence::Loose);
}

#[test]
fn test_select_takes_loose_then_any_match() {
    let era = Some(EraRange::new(1980, 1983));

    let loose = vec![
        track("far", "Song", "Artist", Some("2011")),
        track("near", "Song", "Artist", Some("1984")),
    ];
    let (picked, confidence) = select(&loose, None, era).expect("a match");
    assert_eq!(picked.id, "near");
    assert_eq!(confidence, Confidence::Loose);

    let rejected = vec![
        track("first", "Song", "Artist", Some("2011")),
        track("second", "Song", "Artist", Some("2015")),
    ];
    let (picked, confidence) = select(&rejected, None, era).expect("a match");
    assert_eq!(picked.id, "first");
    assert_eq!(confidence, Confidence::AnyMatch);

    assert!(select(&[], None, era).is_none());
}

#[test]
fn test_search_strategy_queries() {
    let full = suggestion("Song (Extended Remix)", "Artist", None);
    assert_eq!(
        SearchStrategy::TitleArtist.query(&full).as_deref(),
        Some("Song (Extended Remix) Artist")
    );
    assert_eq!(SearchStrategy::Artist.query(&full).as_deref(), Some("Artist"));
    assert_eq!(
        SearchStrategy::Title.query(&full).as_deref(),
        Some("Song (Extended Remix)")
    );
    assert_eq!(
        SearchStrategy::CleanTitleArtist.query(&full).as_deref(),
        Some("Song Artist")
    );

    let no_artist = suggestion("Lonely Title", "  ", None);
    assert_eq!(SearchStrategy::TitleArtist.query(&no_artist), None);
    assert_eq!(SearchStrategy::Artist.query(&no_artist), None);
    assert_eq!(
        SearchStrategy::Title.query(&no_artist).as_deref(),
        Some("Lonely Title")
    );
    assert_eq!(SearchStrategy::CleanTitleArtist.query(&no_artist), None);
}

#[tokio::test]
async fn test_resolve_stops_at_first_acceptable_strategy() {
    let catalog = FakeCatalog::for_user("u1").with_results(
        "Cheryl Lynn",
        vec![track("t1", "Got to Be Real", "Cheryl Lynn", Some("1978-09-01"))],
    );
    let wanted = suggestion("Got to Be Real", "Cheryl Lynn", Some(1978));

    let resolved = resolve_suggestion(&catalog, &wanted, None)
        .await
        .expect("resolved");

    assert_eq!(resolved.track.id, "t1");
    assert_eq!(resolved.reason.as_deref(), Some("Got to Be Real just works"));
    assert_eq!(resolved.suggested_year, Some(1978));
    assert_eq!(
        catalog.searched(),
        vec!["Got to Be Real Cheryl Lynn", "Cheryl Lynn"]
    );
}

#[tokio::test]
async fn test_resolve_tries_every_strategy_before_giving_up() {
    let catalog = FakeCatalog::for_user("u1");
    let wanted = suggestion("Song (Live)", "Band", None);

    assert!(resolve_suggestion(&catalog, &wanted, None).await.is_none());
    assert_eq!(
        catalog.searched(),
        vec!["Song (Live) Band", "Band", "Song (Live)", "Song Band"]
    );
}

#[tokio::test]
async fn test_resolve_aborts_suggestion_on_expired_token() {
    let mut catalog = FakeCatalog::for_user("u1").with_results(
        "Band",
        vec![track("t1", "Song", "Band", Some("1981"))],
    );
    catalog
        .unauthorized_queries
        .insert("Song Band".to_string());

    let wanted = suggestion("Song", "Band", None);
    assert!(resolve_suggestion(&catalog, &wanted, None).await.is_none());
    assert_eq!(catalog.searched(), vec!["Song Band"]);
}

#[tokio::test]
async fn test_resolve_skips_failing_search() {
    let mut catalog = FakeCatalog::for_user("u1").with_results(
        "Band",
        vec![track("t1", "Song", "Band", Some("1981"))],
    );
    catalog.failing_queries.insert("Song Band".to_string());

    let wanted = suggestion("Song", "Band", None);
    let resolved = resolve_suggestion(&catalog, &wanted, None).await;
    assert_eq!(resolved.map(|r| r.track.id), Some("t1".to_string()));
}

#[tokio::test]
async fn test_resolve_all_keeps_suggestion_order() {
    let catalog = FakeCatalog::for_user("u1")
        .with_results("B Two", vec![track("t2", "B", "Two", Some("1982"))])
        .with_results("A One", vec![track("t1", "A", "One", Some("1981"))]);

    let suggestions = vec![
        suggestion("A", "One", Some(1981)),
        suggestion("Missing", "Nobody", None),
        suggestion("B", "Two", Some(1982)),
    ];

    let resolved = resolve_all(&catalog, &suggestions, None).await;
    let ids: Vec<&str> = resolved.iter().map(|r| r.track.id.as_str()).collect();
    assert_eq!(ids, vec!["t1", "t2"]);
}

#[test]
fn test_fallback_terms() {
    assert_eq!(fallback_terms("Dark synth"), &["goth", "darkwave", "post punk"]);
    assert_eq!(
        fallback_terms("electronic dance music"),
        &["electronic", "synth pop", "new wave"]
    );
    assert_eq!(fallback_terms("punk rock"), &["punk", "post punk", "new wave"]);
    assert_eq!(fallback_terms("sunday morning"), &["alternative", "indie"]);
}

#[tokio::test]
async fn test_broad_search_skips_listened_and_stops_at_target() {
    let goth: Vec<_> = (0..8)
        .map(|i| track(&format!("g{}", i), "Goth", "Band", None))
        .collect();
    let darkwave: Vec<_> = (0..8)
        .map(|i| track(&format!("d{}", i), "Wave", "Band", None))
        .collect();

    let catalog = FakeCatalog::for_user("u1")
        .with_results("genre:goth", goth)
        .with_results("genre:darkwave", darkwave);
    let listened: HashSet<String> = ["g0".to_string(), "g1".to_string()].into();

    let found = broad_search(&catalog, "something dark", &listened).await;

    assert_eq!(found.len(), FALLBACK_TARGET);
    assert!(found.iter().all(|r| r.track.id != "g0" && r.track.id != "g1"));
    assert!(found.iter().all(|r| r.reason.is_none()));
    assert_eq!(found[0].track.id, "g2");
    assert_eq!(catalog.searched(), vec!["genre:goth", "genre:darkwave"]);
}

#[tokio::test]
async fn test_broad_search_continues_after_failure() {
    let mut catalog = FakeCatalog::for_user("u1")
        .with_results("genre:indie", vec![track("i1", "Indie", "Band", None)]);
    catalog
        .failing_queries
        .insert("genre:alternative".to_string());

    let found = broad_search(&catalog, "anything", &HashSet::new()).await;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].track.id, "i1");
}
