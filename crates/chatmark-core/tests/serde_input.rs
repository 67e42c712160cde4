#![cfg(feature = "serde")]

use chatmark_core::{Citation, CitationSource, RenderOptions};

#[test]
fn citations_deserialize_from_camel_case_json() -> Result<(), Box<dyn std::error::Error>> {
    let json = r#"[
        {"matchedText": "[S1]", "items": [{"url": "https://x", "title": "X"}]},
        {"matched_text": "[S2]", "items": [{"url": "https://y", "attribution": "Y"}]},
        {"matchedText": "[S3]"}
    ]"#;
    let citations: Vec<Citation> = serde_json::from_str(json)?;
    assert_eq!(
        citations,
        vec![
            Citation::new("[S1]", vec![CitationSource::new("https://x", "X")]),
            Citation::new("[S2]", vec![CitationSource::new("https://y", "Y")]),
            Citation::new("[S3]", Vec::new()),
        ]
    );
    Ok(())
}

#[test]
fn options_fill_in_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let options: RenderOptions = serde_json::from_str(r#"{"linkDisplayLimit": 10}"#)?;
    assert_eq!(options.link_display_limit, 10);
    assert!(options.math);

    let options: RenderOptions = serde_json::from_str("{}")?;
    assert_eq!(options, RenderOptions::default());
    Ok(())
}
