//! Tests for capture and read subcommands.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;
use std::path::Path;

#[test]
fn cli_parse_capture() {
    match parse(&["storeparams", "capture", "https://shop.example/?utm_source=foo"]) {
        CliCommand::Capture {
            url,
            referrer,
            config,
            profile,
        } => {
            assert_eq!(url, "https://shop.example/?utm_source=foo");
            assert!(referrer.is_none());
            assert!(config.config.is_none());
            assert!(config.storage.is_none());
            assert!(profile.profile.is_none());
        }
        _ => panic!("expected Capture"),
    }
}

#[test]
fn cli_parse_capture_all_options() {
    match parse(&[
        "storeparams",
        "capture",
        "https://shop.example/",
        "--referrer",
        "https://google.com/",
        "--storage",
        "sessionStorage",
        "--config",
        "/tmp/storeparams.toml",
        "--profile",
        "/tmp/profile.json",
    ]) {
        CliCommand::Capture {
            url,
            referrer,
            config,
            profile,
        } => {
            assert_eq!(url, "https://shop.example/");
            assert_eq!(referrer.as_deref(), Some("https://google.com/"));
            assert_eq!(config.storage.as_deref(), Some("sessionStorage"));
            assert_eq!(
                config.config.as_deref(),
                Some(Path::new("/tmp/storeparams.toml"))
            );
            assert_eq!(profile.profile.as_deref(), Some(Path::new("/tmp/profile.json")));
        }
        _ => panic!("expected Capture with options"),
    }
}

#[test]
fn cli_parse_capture_requires_url() {
    assert!(Cli::try_parse_from(["storeparams", "capture"]).is_err());
}

#[test]
fn cli_parse_read() {
    match parse(&["storeparams", "read", "utm_source", "--storage", "localStorage"]) {
        CliCommand::Read {
            key,
            config,
            profile,
        } => {
            assert_eq!(key, "utm_source");
            assert_eq!(config.storage.as_deref(), Some("localStorage"));
            assert!(profile.profile.is_none());
        }
        _ => panic!("expected Read"),
    }
}
