// textsift-core/tests/extractor_integration_tests.rs
use anyhow::Result;

use textsift_core::config::{merge_configs, EntityKind, ExtractionConfig};
use textsift_core::extractor::Extractor;

fn default_extractor() -> Result<Extractor> {
    let config = ExtractionConfig::load_default_rules()?;
    Ok(Extractor::new(&config)?)
}

fn sorted(mut v: Vec<String>) -> Vec<String> {
    v.sort();
    v
}

#[test]
fn end_to_end_mixed_sentence() -> Result<()> {
    let extractor = default_extractor()?;
    let input = "Contact a@b.com or visit https://x.com. Pay Rwf 1,500.00 at 10:30 AM.";

    let result = extractor.extract_all(input)?;

    assert_eq!(result.emails, vec!["***@b.com".to_string()]);
    assert_eq!(result.urls, vec!["https://x.com".to_string()]);
    assert_eq!(result.currency_amounts, vec!["Rwf 1,500.00".to_string()]);
    assert_eq!(result.times, vec!["10:30 AM".to_string()]);
    assert!(result.phone_numbers.is_empty());
    assert!(result.credit_cards.is_empty());
    Ok(())
}

#[test]
fn multi_entity_document() -> Result<()> {
    let extractor = default_extractor()?;
    let input = "\
Hello,
Please visit https://www.apple.com, https://www.igihe.com or https://mail.google.com for more info.
You can contact our team: ngabonziza@example.rw, rugwiro.work@company.com, or nshuti.official@dev.org.
Our support lines are (250) 788-123456 and 078-123-4567.
For payments, use credit card 1234-5678-9012-3456.
The total cost is Rwf 1,500,000. We already paid Rwf 500,000 at 10:30 AM.
The next meeting is at 14:30 or 4:00 PM.
";

    let result = extractor.extract_all(input)?;

    assert_eq!(
        sorted(result.emails),
        vec!["n***@dev.org", "n***@example.rw", "r***@company.com"]
    );
    assert_eq!(
        sorted(result.urls),
        vec![
            "https://mail.google.com",
            "https://www.apple.com",
            "https://www.igihe.com",
        ]
    );
    assert_eq!(
        sorted(result.phone_numbers),
        vec!["(250) 788-123456", "078-123-4567"]
    );
    assert_eq!(result.credit_cards, vec!["1234-5678-9012-3456"]);
    assert_eq!(sorted(result.times), vec!["10:30 AM", "14:30", "4:00 PM"]);
    assert_eq!(
        sorted(result.currency_amounts),
        vec!["Rwf 1,500,000", "Rwf 500,000"]
    );
    Ok(())
}

#[test]
fn duplicate_entities_are_reported_once_per_kind() -> Result<()> {
    let extractor = default_extractor()?;
    let input = "Mail x@y.com, then mail x@y.com again; see https://y.com and https://y.com.";

    let result = extractor.extract_all(input)?;

    assert_eq!(result.emails, vec!["***@y.com".to_string()]);
    assert_eq!(result.urls, vec!["https://y.com".to_string()]);
    Ok(())
}

#[test]
fn distinct_emails_with_equal_masked_form_collapse() -> Result<()> {
    // Masking runs before deduplication, so two locals sharing a first
    // character and domain collapse to one entry.
    let extractor = default_extractor()?;
    let result = extractor.extract_all("ab@x.com and ag@x.com")?;

    assert_eq!(result.emails, vec!["a***@x.com".to_string()]);
    Ok(())
}

#[test]
fn numeric_token_fires_multiple_recognizers_independently() -> Result<()> {
    // Recognizers run independently and deduplication is per kind, so one
    // digit run feeds both the credit-card and phone-number lists.
    let extractor = default_extractor()?;
    let result = extractor.extract_all("ref 1234567890123456 end")?;

    assert_eq!(result.credit_cards, vec!["1234567890123456".to_string()]);
    assert_eq!(result.phone_numbers, vec!["123456789012".to_string()]);
    Ok(())
}

#[test]
fn extraction_is_idempotent() -> Result<()> {
    let extractor = default_extractor()?;
    let input = "Ping o@p.io at 09:45 or call 078-123-4567.";

    let first = extractor.extract_all(input)?;
    let second = extractor.extract_all(input)?;

    assert_eq!(first, second);
    Ok(())
}

#[test]
fn no_matches_yields_empty_sequences_for_every_kind() -> Result<()> {
    let extractor = default_extractor()?;
    let result = extractor.extract_all("Nothing structured lives here.")?;

    assert!(result.is_empty());
    for kind in EntityKind::ALL {
        assert!(result.entries(kind).is_empty(), "kind {kind} not empty");
    }
    Ok(())
}

#[test]
fn script_block_is_redacted_before_matching() -> Result<()> {
    let extractor = default_extractor()?;
    let input = "Mail keep@me.rw <script>\nvar hidden = 'gone@evil.rw';\n</script> done";

    let result = extractor.extract_all(input)?;

    assert_eq!(result.emails, vec!["k***@me.rw".to_string()]);
    assert!(result.script_redacted);
    Ok(())
}

#[test]
fn oversized_input_short_circuits_with_no_matching() -> Result<()> {
    let extractor = default_extractor()?;
    let mut input = "a@b.com ".repeat(2000);
    assert!(input.chars().count() > textsift_core::MAX_INPUT_CHARS);

    for _ in 0..2 {
        let err = extractor.extract_all(&input).unwrap_err();
        assert!(matches!(err, textsift_core::SiftError::InputTooLarge(_)));
    }

    // Trimming under the cap recovers normally.
    input.truncate(8);
    let result = extractor.extract_all(&input)?;
    assert_eq!(result.emails, vec!["***@b.com".to_string()]);
    Ok(())
}

#[test]
fn dollar_currency_profile_via_user_overlay() -> Result<()> {
    let default_config = ExtractionConfig::load_default_rules()?;
    let mut user_config = ExtractionConfig::default();
    user_config.recognizers.currency.marker = Some("$".to_string());

    let merged = merge_configs(default_config, Some(user_config));
    let extractor = Extractor::new(&merged)?;

    let result = extractor.extract_all("Pay $ 1,500.00 now or $25 later. Rwf 100 is ignored.")?;

    assert_eq!(
        sorted(result.currency_amounts),
        vec!["$ 1,500.00", "$25"]
    );
    Ok(())
}

#[test]
fn disabled_kind_yields_empty_sequence_not_absent_key() -> Result<()> {
    let mut config = ExtractionConfig::load_default_rules()?;
    config.set_active_kinds(&[], &[EntityKind::CreditCard]);
    let extractor = Extractor::new(&config)?;

    let result = extractor.extract_all("card 1234-5678-9012-3456, mail q@r.st")?;

    assert!(result.credit_cards.is_empty());
    assert_eq!(result.emails, vec!["***@r.st".to_string()]);

    let json: serde_json::Value = serde_json::to_value(&result)?;
    assert!(json["credit_cards"].as_array().unwrap().is_empty());
    Ok(())
}

#[test]
fn match_report_carries_spans_and_hashes() -> Result<()> {
    let extractor = default_extractor()?;
    let input = "see q@r.st at 10:30";

    let matches = extractor.find_matches_for_report(input)?;

    assert_eq!(matches.len(), 2);
    assert!(matches.windows(2).all(|w| w[0].start <= w[1].start));
    for m in &matches {
        assert!(m.sample_hash.is_some());
        assert_eq!(&input[m.start as usize..m.end as usize], m.original_string);
    }

    let email = matches.iter().find(|m| m.kind == EntityKind::Email).unwrap();
    assert_eq!(email.original_string, "q@r.st");
    assert_eq!(email.output_string, "***@r.st");
    Ok(())
}
