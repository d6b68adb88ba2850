use broadcast_feed::{
    matches, parse, parse_detailed, parse_value, write_free_text, Broadcast, Feed, Format,
    ParseError, Role, Utterance,
};
use serde_json::json;

fn broadcasts(feed: Feed) -> Vec<Broadcast> {
    match feed {
        Feed::Broadcasts(b) => b,
        Feed::Articles(_) => panic!("expected broadcasts"),
    }
}

#[test]
fn record_count_equals_sigil_lines() {
    let raw = "preamble\n📡 One\n— a\n📡 Two\n\n📡 Three\n— mention of 📡 inside";
    let sigil_lines = raw.lines().filter(|l| l.trim_start().starts_with('📡')).count();
    let feed = parse(raw, Format::FreeText).unwrap();
    assert_eq!(feed.len(), sigil_lines);
}

#[test]
fn free_text_round_trip() {
    let raw = "📡 Вечір\n🎙 Host Ann\nimage: images/a.png\n— Host Ann: Вітаю\n— Guest: Привіт\nбез імені\n— ще один\n\n📡 Порожній";
    let first = broadcasts(parse(raw, Format::FreeText).unwrap());
    let rewritten = write_free_text(&first);
    let second = broadcasts(parse(rewritten.as_str(), Format::FreeText).unwrap());
    assert_eq!(first, second);
    assert_eq!(second[0].images, vec!["images/a.png"]);
    assert_eq!(second[0].utterances.len(), 4);
}

#[test]
fn constructed_broadcast_round_trip() {
    let original = Broadcast {
        title: "📡 Built by hand".to_string(),
        host: Some("Presenter".to_string()),
        utterances: vec![
            Utterance {
                speaker_name: Some("Host".to_string()),
                text: "Welcome".to_string(),
                role: Role::Primary,
            },
            Utterance {
                speaker_name: None,
                text: "an anonymous caller".to_string(),
                role: Role::Counterpart,
            },
        ],
        images: vec!["images/studio.gif".to_string()],
    };
    let text = write_free_text(std::slice::from_ref(&original));
    let parsed = broadcasts(parse(text.as_str(), Format::FreeText).unwrap());
    assert_eq!(parsed, vec![original]);
}

#[test]
fn flat_record_example() {
    let parsed = parse_detailed(
        "1|Title|2025-01-01|Author|Excerpt|img.jpg|Body text\n2|Four|fields|only",
        Format::FlatRecord,
    )
    .unwrap();
    let Feed::Articles(a) = parsed.feed else { panic!("expected articles") };
    assert_eq!(a.len(), 1);
    assert_eq!(a[0].content, "Body text");
    assert!(a[0].published().is_some());
    assert_eq!(parsed.skipped.len(), 1);
}

#[test]
fn structured_input_not_an_array() {
    let err = parse_value(&json!(42)).unwrap_err();
    assert!(matches!(err, ParseError::MalformedInput { .. }));
    let err = parse("not json at all", Format::Structured).unwrap_err();
    assert!(err.to_string().contains("structured"));
}

#[test]
fn search_over_parsed_feed() {
    let raw = std::fs::read_to_string("tests/fixtures/efir.txt").unwrap();
    let feed = parse(raw.as_str(), Format::FreeText).unwrap();

    assert_eq!(feed.filter("").len(), feed.len());
    let hits = feed.filter("MAYOR");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits.titles(), vec!["📡 Ранковий ефір: новини міста"]);
    assert!(feed.filter("no such words anywhere").is_empty());

    for b in broadcasts(feed) {
        assert!(matches(&b, ""));
        assert!(matches(&b, &b.title.to_uppercase()));
    }
}

#[test]
fn structured_and_free_text_agree() {
    let from_text = broadcasts(parse("📡 Same\n🎙 Ann\n— Host: hi\n— Guest: hey", Format::FreeText).unwrap());
    let from_json = broadcasts(
        parse_value(&json!([{
            "title": "📡 Same",
            "host": "Ann",
            "dialogue": [
                { "speaker": "Host", "text": "hi" },
                { "name": "Guest", "text": "hey" }
            ]
        }]))
        .unwrap(),
    );
    assert_eq!(from_text, from_json);
}

#[test]
fn articles_fixture_via_json_output() {
    let raw = std::fs::read_to_string("tests/fixtures/articles.psv").unwrap();
    let mut feed = parse(raw.as_str(), Format::FlatRecord).unwrap();
    feed.sort_newest_first();
    let value = serde_json::to_value(&feed).unwrap();
    assert_eq!(value["kind"], "articles");
    assert_eq!(value["records"][0]["id"], "5");
    assert_eq!(value["records"][3]["id"], "1");
}
