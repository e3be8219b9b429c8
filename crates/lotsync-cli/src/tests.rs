use super::*;

#[test]
fn no_flags_is_interactive_with_all_panels() {
    let cli = Cli::try_parse_from(["lotsync"]).expect("expected valid cli args");
    assert!(!cli.once);
    assert!(!cli.json);
    assert!(!cli.no_map);
    assert!(!cli.no_legend);
}

#[test]
fn parses_once_with_json() {
    let cli = Cli::try_parse_from(["lotsync", "--once", "--json"]).expect("expected valid cli args");
    assert!(cli.once);
    assert!(cli.json);
}

#[test]
fn json_requires_once() {
    let err = Cli::try_parse_from(["lotsync", "--json"]).unwrap_err();
    assert_eq!(
        err.kind(),
        clap::error::ErrorKind::MissingRequiredArgument
    );
}

#[test]
fn parses_panel_toggles() {
    let cli =
        Cli::try_parse_from(["lotsync", "--no-map", "--no-legend"]).expect("expected valid cli args");
    assert!(cli.no_map);
    assert!(cli.no_legend);
}

#[test]
fn rejects_unknown_flag() {
    assert!(Cli::try_parse_from(["lotsync", "--watch"]).is_err());
}

#[test]
fn current_status_releases_the_channel_lock() {
    let (tx, rx) = watch::channel(SyncStatus::Loading);
    let status = current_status(&rx);
    // Would deadlock if `status` still held the read guard.
    tx.send_replace(SyncStatus::Ready(lotsync_client::Snapshot {
        records: Vec::new(),
        fetched_at: chrono::Utc::now(),
    }));
    assert!(status.is_loading());
    assert!(!rx.borrow().is_loading());
}
