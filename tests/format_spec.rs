//! Unit coverage for the archive parsers, blob access, and classification.

use stardict_importer::stardict::{blob::BlobStore, classify, extract, header, index};
use stardict_importer::{Gender, ImportError, Script, SkipReason};

fn encode_idx(entries: &[(&str, u32, u32)]) -> Vec<u8> {
    let mut buf = Vec::new();
    for (word, offset, length) in entries {
        buf.extend_from_slice(word.as_bytes());
        buf.push(0);
        buf.extend_from_slice(&offset.to_be_bytes());
        buf.extend_from_slice(&length.to_be_bytes());
    }
    buf
}

#[test]
fn header_parses_required_and_extra_fields() {
    let content = "StarDict's dict ifo file\n\
                   version=2.4.2\n\
                   bookname=Monier-Williams\n\
                   wordcount=160000\n\
                   idxfilesize=3024324\n\
                   description=key=value stays whole\n\
                   not a key value line\n";
    let metadata = header::parse(content).expect("header should parse");

    assert_eq!(metadata.version, "2.4.2");
    assert_eq!(metadata.bookname, "Monier-Williams");
    assert_eq!(metadata.wordcount, 160000);
    assert_eq!(metadata.idxfilesize, 3024324);
    // Only the first `=` splits; the rest belongs to the value.
    assert_eq!(
        metadata.extra.get("description").map(String::as_str),
        Some("key=value stays whole")
    );
}

#[test]
fn header_rejects_bad_signature() {
    let err = header::parse("Some other dictionary format\nversion=1\n").unwrap_err();
    assert!(matches!(err, ImportError::InvalidFormat(_)), "got {:?}", err);
}

#[test]
fn header_reports_missing_field_by_name() {
    let content = "StarDict's dict ifo file\nversion=2.4.2\nbookname=X\nidxfilesize=10\n";
    let err = header::parse(content).unwrap_err();
    assert!(
        matches!(err, ImportError::MissingField("wordcount")),
        "got {:?}",
        err
    );
}

#[test]
fn header_reports_malformed_numeric_value() {
    let content =
        "StarDict's dict ifo file\nversion=2.4.2\nbookname=X\nwordcount=many\nidxfilesize=10\n";
    let err = header::parse(content).unwrap_err();
    match err {
        ImportError::MalformedValue { field, value } => {
            assert_eq!(field, "wordcount");
            assert_eq!(value, "many");
        }
        other => panic!("expected MalformedValue, got {:?}", other),
    }
}

#[test]
fn index_parses_well_formed_entries_in_order() {
    let data = encode_idx(&[("veda", 0, 4), ("yajña", 4, 6), ("agni", 10, 3)]);
    let parsed = index::parse(&data).expect("index should parse");

    assert!(!parsed.partial);
    assert_eq!(parsed.entries.len(), 3);
    assert_eq!(parsed.entries[0].word, "veda");
    assert_eq!(parsed.entries[0].offset, 0);
    assert_eq!(parsed.entries[0].length, 4);
    assert_eq!(parsed.entries[1].word, "yajña");
    assert_eq!(parsed.entries[2].word, "agni");
    assert_eq!(parsed.entries[2].offset, 10);
}

#[test]
fn index_truncated_mid_entry_is_partial_and_deterministic() {
    let full = encode_idx(&[("veda", 0, 4), ("mantra", 4, 10), ("agni", 14, 3)]);
    // Cut into the last entry's span fields.
    let truncated = &full[..full.len() - 4];

    let first = index::parse(truncated).expect("truncated parse should succeed");
    assert!(first.partial);
    assert_eq!(first.entries.len(), 2);

    // Re-parsing identical bytes yields an identical entry count.
    let second = index::parse(truncated).expect("re-parse should succeed");
    assert!(second.partial);
    assert_eq!(first.entries, second.entries);
}

#[test]
fn index_without_final_nul_is_partial() {
    let mut data = encode_idx(&[("veda", 0, 4)]);
    data.extend_from_slice(b"danglingword");
    let parsed = index::parse(&data).expect("parse should succeed");
    assert!(parsed.partial);
    assert_eq!(parsed.entries.len(), 1);
}

#[test]
fn index_empty_buffer_is_complete_and_empty() {
    let parsed = index::parse(&[]).expect("empty parse should succeed");
    assert!(!parsed.partial);
    assert!(parsed.entries.is_empty());
}

#[test]
fn index_rejects_invalid_utf8_word() {
    let mut data = vec![0xFF, 0xFE, 0x00];
    data.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 4]);
    let err = index::parse(&data).unwrap_err();
    assert!(matches!(err, ImportError::InvalidFormat(_)), "got {:?}", err);
}

#[test]
fn blob_slices_in_bounds_spans() {
    let blob = BlobStore::new(b"knowledge".to_vec());
    assert_eq!(blob.slice(0, 4).expect("in-bounds slice"), b"know");
    assert_eq!(blob.slice(4, 5).expect("in-bounds slice"), b"ledge");
    assert_eq!(blob.len(), 9);
}

#[test]
fn blob_rejects_out_of_range_and_overflowing_spans() {
    let blob = BlobStore::new(vec![0u8; 50]);
    assert!(matches!(
        blob.slice(4, 100),
        Err(ImportError::OutOfBounds { offset: 4, length: 100, blob_len: 50 })
    ));
    assert!(matches!(
        blob.slice(u32::MAX, u32::MAX),
        Err(ImportError::OutOfBounds { .. })
    ));
    // Zero-length slice at the very end is still in bounds.
    assert_eq!(blob.slice(50, 0).expect("empty tail slice"), b"");
}

#[test]
fn classifier_is_pure_and_tags_scripts() {
    assert_eq!(classify::classify("वेद").0, Script::Devanagari);
    assert_eq!(classify::classify("veda").0, Script::Romanized);
    assert_eq!(classify::classify("brāhmaṇa").0, Script::Iast);

    let first = classify::classify("brāhmaṇa");
    let second = classify::classify("brāhmaṇa");
    assert_eq!(first, second);
}

#[test]
fn classifier_guesses_gender_from_suffixes() {
    assert_eq!(classify::classify("deva").1, Some(Gender::Masculine));
    assert_eq!(classify::classify("devī").1, Some(Gender::Feminine));
    assert_eq!(classify::classify("phalam").1, Some(Gender::Neuter));
    // No matching suffix is a valid result, not an error.
    assert_eq!(classify::classify("manas").1, None);
}

#[test]
fn extractor_sanitizes_definitions() {
    let blob = BlobStore::new(b"fire \x01\x02 god;\n\n  hymn".to_vec());
    let entries = vec![stardict_importer::IndexEntry {
        word: "agni".to_string(),
        offset: 0,
        length: blob.len() as u32,
    }];
    let extractor = extract::DefinitionExtractor::new(extract::ExtractPolicy::default());
    let outcome = extractor.extract_all(&entries, &blob, "test-dict");

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].definition, "fire god; hymn");
    assert_eq!(outcome.records[0].source_archive, "test-dict");
    assert!(outcome.skipped.is_empty());
}

#[test]
fn extractor_skips_by_reason_without_aborting() {
    let blob = BlobStore::new(b"0123456789".to_vec());
    let long_word = "a".repeat(300);
    let entries = vec![
        stardict_importer::IndexEntry {
            word: "good".to_string(),
            offset: 0,
            length: 5,
        },
        stardict_importer::IndexEntry {
            word: "oob".to_string(),
            offset: 8,
            length: 100,
        },
        stardict_importer::IndexEntry {
            word: "blank".to_string(),
            offset: 0,
            length: 0,
        },
        stardict_importer::IndexEntry {
            word: long_word.clone(),
            offset: 0,
            length: 5,
        },
    ];

    let extractor = extract::DefinitionExtractor::new(extract::ExtractPolicy::default());
    let outcome = extractor.extract_all(&entries, &blob, "test-dict");

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].word, "good");
    let reasons: Vec<SkipReason> = outcome.skipped.iter().map(|s| s.reason).collect();
    assert_eq!(
        reasons,
        vec![
            SkipReason::OffsetOutOfBounds,
            SkipReason::EmptyContent,
            SkipReason::TooLong
        ]
    );
}

#[test]
fn extractor_limits_can_be_disabled() {
    let blob = BlobStore::new(b"0123456789".to_vec());
    let long_word = "a".repeat(300);
    let entries = vec![stardict_importer::IndexEntry {
        word: long_word,
        offset: 0,
        length: 5,
    }];

    let extractor = extract::DefinitionExtractor::new(extract::ExtractPolicy::new(false));
    let outcome = extractor.extract_all(&entries, &blob, "test-dict");
    assert_eq!(outcome.records.len(), 1);
    assert!(outcome.skipped.is_empty());
}

#[test]
fn extractor_replaces_invalid_utf8_in_definitions() {
    let blob = BlobStore::new(vec![b'o', b'k', 0xFF, b'o', b'k']);
    let entries = vec![stardict_importer::IndexEntry {
        word: "w".to_string(),
        offset: 0,
        length: 5,
    }];
    let extractor = extract::DefinitionExtractor::new(extract::ExtractPolicy::default());
    let outcome = extractor.extract_all(&entries, &blob, "test-dict");
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].definition, "ok\u{FFFD}ok");
}
