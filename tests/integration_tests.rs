use std::io::{self, Read};
use vcard::{from_str, parse_all, to_string, to_string_unfolded, Card, Error, Parser, Property};

// A sample vCard from Wikipedia: https://en.wikipedia.org/wiki/VCard#vCard_3.0
const SAMPLE_VCARD: &str = "BEGIN:VCARD
VERSION:3.0
N:Gump;Forrest;;Mr.;
FN:Forrest Gump
ORG:Bubba Gump Shrimp Co.
TITLE:Shrimp Man
PHOTO;VALUE=URI;TYPE=GIF:http://www.example.com/dir_photos/my_photo.gif
TEL;TYPE=WORK,VOICE:(111) 555-1212
TEL;TYPE=HOME,VOICE:(404) 555-1212
ADR;TYPE=WORK,PREF:;;100 Waters Edge;Baytown;LA;30314;United States of America
LABEL;TYPE=WORK,PREF:100 Waters Edge\\nBaytown\\, LA 30314\\nUnited States of America
ADR;TYPE=HOME:;;42 Plantation St.;Baytown;LA;30314;United States of America
LABEL;TYPE=HOME:42 Plantation St.\\nBaytown\\, LA 30314\\nUnited States of America
EMAIL:forrestgump@example.com
REV:2008-04-24T19:52:43Z
END:VCARD";

fn prop(values: &[&str], params: &[(&str, &[&str])]) -> Property {
    let mut p = Property::with_values(values.iter().copied());
    for (key, vals) in params {
        p.set_param(key, vals.iter().copied());
    }
    p
}

fn sample_card() -> Card {
    let mut card = Card::new();
    card.add("VERSION", prop(&["3.0"], &[]));
    card.add("N", prop(&["Gump;Forrest;;Mr.;"], &[]));
    card.add("FN", prop(&["Forrest Gump"], &[]));
    card.add("ORG", prop(&["Bubba Gump Shrimp Co."], &[]));
    card.add("TITLE", prop(&["Shrimp Man"], &[]));
    card.add(
        "PHOTO",
        prop(
            &["http://www.example.com/dir_photos/my_photo.gif"],
            &[("VALUE", &["URI"]), ("TYPE", &["GIF"])],
        ),
    );
    card.add("TEL", prop(&["(111) 555-1212"], &[("TYPE", &["WORK", "VOICE"])]));
    card.add("TEL", prop(&["(404) 555-1212"], &[("TYPE", &["HOME", "VOICE"])]));
    card.add(
        "ADR",
        prop(
            &[";;100 Waters Edge;Baytown;LA;30314;United States of America"],
            &[("TYPE", &["WORK", "PREF"])],
        ),
    );
    card.add(
        "LABEL",
        prop(
            &["100 Waters Edge\nBaytown, LA 30314\nUnited States of America"],
            &[("TYPE", &["WORK", "PREF"])],
        ),
    );
    card.add(
        "ADR",
        prop(
            &[";;42 Plantation St.;Baytown;LA;30314;United States of America"],
            &[("TYPE", &["HOME"])],
        ),
    );
    card.add(
        "LABEL",
        prop(
            &["42 Plantation St.\nBaytown, LA 30314\nUnited States of America"],
            &[("TYPE", &["HOME"])],
        ),
    );
    card.add("EMAIL", prop(&["forrestgump@example.com"], &[]));
    card.add("REV", prop(&["2008-04-24T19:52:43Z"], &[]));
    card
}

fn single(name: &str, p: Property) -> Card {
    let mut card = Card::new();
    card.add(name, p);
    card
}

fn success_cases() -> Vec<(&'static str, Card)> {
    let mut grouped = Property::new("value");
    grouped.set_group("GROUP");

    let mut two = Card::new();
    two.add("PROP", prop(&["value"], &[]));
    two.add("PROP", prop(&["value2"], &[]));

    let mut params = Card::new();
    params.add("PROP-1", prop(&["value"], &[("PARAM", &["test"])]));
    params.add("PROP-2", prop(&["value2"], &[("PARAM", &["test"])]));

    vec![
        (
            "BEGIN:VCARD\r\nPROP:value\r\nEND:VCARD\r\n",
            single("PROP", prop(&["value"], &[])),
        ),
        (
            "BEG\r\n IN\r\n :VCARD\r\nPROP:va\r\n lue\r\nEND:\r\n VCARD\r\n",
            single("PROP", prop(&["value"], &[])),
        ),
        (
            "BEGIN:VCARD\r\nPROP:value\r\nEND:VCARD",
            single("PROP", prop(&["value"], &[])),
        ),
        (
            "begin:vCard\r\nprop:value\r\nend:vCard\r\n",
            single("PROP", prop(&["value"], &[])),
        ),
        (
            "begin:vcard\nprop:value\nend:vcard\n",
            single("PROP", prop(&["value"], &[])),
        ),
        (
            "begin:vcard\npr\n op:\n value\nend:vcard\n",
            single("PROP", prop(&["value"], &[])),
        ),
        (
            "begin:vcard\nprop:value\nend:vcard",
            single("PROP", prop(&["value"], &[])),
        ),
        ("BEGIN:VCARD\r\nPROP:value\r\nPROP:value2\r\nEND:VCARD\r\n", two),
        (
            "BEGIN:VCARD\r\nPROP-1;PARAM=test:value\r\nprop-2;param=\"test\":value2\r\nEND:VCARD\r\n",
            params,
        ),
        (
            "BEGIN:VCARD\r\nX-PROP;PARAM=test;PARAM2=test2,\"hello,there\":value\r\nEND:VCARD\r\n",
            single(
                "X-PROP",
                prop(
                    &["value"],
                    &[("PARAM", &["test"]), ("PARAM2", &["test2", "hello,there"])],
                ),
            ),
        ),
        (
            "BEGIN:VCARD\r\nPROP:value1,value2\r\nEND:VCARD\r\n",
            single("PROP", prop(&["value1", "value2"], &[])),
        ),
        (
            "BEGIN:VCARD\r\nPROP:value1\\,value2\\\\,\\\\,\\;;\\;\r\nEND:VCARD\r\n",
            single("PROP", prop(&["value1,value2\\", "\\", "\\;;\\;"], &[])),
        ),
        (
            "BEGIN:VCARD\r\nPROP:\r\nEND:VCARD\r\n",
            single("PROP", prop(&[""], &[])),
        ),
        (
            "BEGIN:VCARD\r\nPROP:multiple\\nlines\r\nEND:VCARD\r\n",
            single("PROP", prop(&["multiple\nlines"], &[])),
        ),
        (
            "BEGIN:VCARD\r\nGROUP.PROP:value\r\nEND:VCARD\r\n",
            single("PROP", grouped.clone()),
        ),
        (
            "BEGIN:VCARD\r\nGroup.Prop:value\r\nEND:VCARD\r\n",
            single("PROP", grouped),
        ),
        (SAMPLE_VCARD, sample_card()),
    ]
}

#[test]
fn test_parse_all() {
    for (input, expected) in success_cases() {
        let cards = parse_all(input.as_bytes()).unwrap_or_else(|e| panic!("{input:?}: {e}"));
        assert_eq!(cards.len(), 1, "{input:?}");
        assert_eq!(cards[0], expected, "{input:?}");
    }
}

#[test]
fn test_streaming_parser() {
    for (input, expected) in success_cases() {
        let mut parser = Parser::new(input.as_bytes());
        let card = parser.next_card().unwrap_or_else(|e| panic!("{input:?}: {e}"));
        assert_eq!(card.as_ref(), Some(&expected), "{input:?}");
        assert!(parser.next_card().unwrap().is_none(), "{input:?}");
        assert!(parser.next_card().unwrap().is_none(), "{input:?}");
    }
}

#[test]
fn test_parse_all_failure() {
    let cases = [
        ("PROP:VALUE\r\nEND:VCARD", 1, "expected beginning of card"),
        ("BEGIN:VCARD\r\n", 2, "unexpected end of input"),
        ("BEGIN:VCARD\r\nEND:SOMETHING\r\n", 2, "malformed end tag"),
        (" BAD\r\n", 1, "expected property name"),
        ("BEGIN:VCARD\r\nPROP\r\nEND:VCARD\r\n", 2, "expected ':'"),
        ("BEGIN:VCARD\r\nPROP=2\r\nEND:VCARD\r\n", 2, "expected ':'"),
        ("BEGIN:VCARD\r\nPROP;:2\r\nEND:VCARD\r\n", 2, "expected parameter name"),
        (
            "BEGIN:VCARD\r\nPROP;PARAM:2\r\nEND:VCARD\r\n",
            2,
            "expected '=' after parameter name",
        ),
        (
            "BEGIN:VCARD\r\nPROP;PARAM=\"test\n\":2\r\nEND:VCARD\r\n",
            2,
            "unexpected byte '\\n' in quoted parameter value",
        ),
        (
            "BEGIN:VCARD\r\nPROP:escape\\:\r\nEND:VCARD\r\n",
            2,
            "':' cannot be escaped",
        ),
        (
            "BEGIN:VCARD\r\nPROP;PARAM=\"test",
            2,
            "unexpected end of quoted parameter value",
        ),
        (
            "BEGIN:VCARD\r\nNOTE:a\r\n b\r\nPROP:escape\\q\r\nEND:VCARD\r\n",
            3,
            "'q' cannot be escaped",
        ),
        ("BEGIN:VCARD\r\nPROP", 2, "expected parameters or property value"),
    ];

    for (input, line, msg) in cases {
        let err = match parse_all(input.as_bytes()) {
            Ok(cards) => panic!("successfully parsed {cards:?} from {input:?}"),
            Err(partial) => {
                assert!(partial.cards.is_empty(), "{input:?}");
                partial.error
            }
        };
        assert!(!err.is_io(), "{input:?}: {err}");
        assert_eq!(err.line(), Some(line), "{input:?}: {err}");
        assert!(err.message().contains(msg), "{input:?}: {err}, want {msg:?}");
    }
}

#[test]
fn test_unexpected_end_is_distinct() {
    let err = from_str("BEGIN:VCARD\r\nPROP;PARAM=\"test").unwrap_err().error;
    assert!(matches!(err, Error::UnexpectedEof { line: 2, .. }));

    let err = from_str("BEGIN:VCARD\r\nPROP;PARAM=\"test\n\":2\r\n").unwrap_err().error;
    assert!(matches!(err, Error::Syntax { line: 2, .. }));
}

#[test]
fn test_failure_keeps_earlier_cards() {
    let input = "BEGIN:VCARD\r\nFN:One\r\nEND:VCARD\r\n\
                 BEGIN:VCARD\r\nFN:Two\r\nEND:VCARD\r\n\
                 BEGIN:VCARD\r\nFN:Three\r\n";
    let (cards, error) = from_str(input).unwrap_err().into_parts();

    let names: Vec<_> = cards.iter().map(|c| c.get("FN")[0].value()).collect();
    assert_eq!(names, ["One", "Two"]);
    assert!(error.is_eof());
    assert_eq!(error.line(), Some(9));
}

struct BrokenSource;

impl Read for BrokenSource {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::TimedOut, "source timed out"))
    }
}

#[test]
fn test_io_errors_pass_through() {
    let source = "BEGIN:VCARD\r\nFN:One\r\nEND:VCARD\r\nBEGIN:VCARD\r\nFN:Tw"
        .as_bytes()
        .chain(BrokenSource);
    let partial = parse_all(source).unwrap_err();

    assert_eq!(partial.cards.len(), 1);
    match partial.error {
        Error::Io(e) => assert_eq!(e.kind(), io::ErrorKind::TimedOut),
        other => panic!("expected an I/O error, got {other:?}"),
    }
}

#[test]
fn test_unfolded_string_lines() {
    let expected: Vec<&str> = SAMPLE_VCARD.lines().collect();
    let unfolded = to_string_unfolded(&sample_card());
    let actual: Vec<&str> = unfolded.lines().collect();

    assert_eq!(actual.len(), expected.len());
    assert_eq!(actual[0], expected[0]);
    assert_eq!(actual[1], expected[1]);
    assert_eq!(actual.last(), expected.last());

    for line in &expected {
        assert!(actual.contains(line), "missing line {line:?}");
    }
}

#[test]
fn test_sample_round_trip() {
    let card = sample_card();
    let text = to_string(&card);

    assert!(text.split("\r\n").all(|line| line.len() <= 75));
    assert_eq!(from_str(&text).unwrap(), [card]);
}

#[test]
fn test_multiple_cards_in_one_stream() {
    let input = format!("{SAMPLE_VCARD}\r\n{SAMPLE_VCARD}\r\nBEGIN:VCARD\r\nEND:VCARD");
    let cards = from_str(&input).unwrap();

    assert_eq!(cards.len(), 3);
    assert_eq!(cards[0], cards[1]);
    assert!(cards[2].is_empty());
}
