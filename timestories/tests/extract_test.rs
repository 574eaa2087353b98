use common::ExtractStrategy;
use timestories::extract::Extractor;
use timestories::model::Story;

const HOMEPAGE: &str = include_str!("fixtures/homepage.html");
const STRATEGIES: [ExtractStrategy; 2] = [ExtractStrategy::Dom, ExtractStrategy::Scan];

fn extractor(base: &str, limit: usize, strategy: ExtractStrategy) -> Extractor {
    Extractor::new(base, limit, strategy).expect("valid base url")
}

fn story(title: &str, link: &str) -> Story {
    Story {
        title: title.to_string(),
        link: link.to_string(),
    }
}

#[test]
fn homepage_fixture_yields_first_six_stories_in_order() {
    let expected = vec![
        story("Senate Passes Budget Deal", "https://time.com/7012345/senate-vote-budget/"),
        story("Climate Report Warns of Record Heat", "https://time.com/7012346/climate-report/"),
        story("What New & Stricter Chip Rules Mean", "https://time.com/7012347/ai-chips-export/"),
        story("Olympics Recap", "https://time.com/7012348/olympics-recap/"),
        story("Markets Today", "https://time.com/7012349/markets-today/"),
        story("New Health Study", "https://time.com/7012350/health-study/"),
    ];

    for strategy in STRATEGIES {
        let stories = extractor("https://time.com", 6, strategy).extract(HOMEPAGE);
        assert_eq!(stories, expected, "strategy {}", strategy);
    }
}

#[test]
fn backends_agree_on_the_fixture() {
    let dom = extractor("https://time.com", 50, ExtractStrategy::Dom).extract(HOMEPAGE);
    let scan = extractor("https://time.com", 50, ExtractStrategy::Scan).extract(HOMEPAGE);
    assert_eq!(dom.len(), 7);
    assert_eq!(dom, scan);
}

#[test]
fn nested_markup_in_root_relative_anchor() {
    let page = r#"<a href="/1234567/a-title">Hello <b>World</b></a>"#;
    for strategy in STRATEGIES {
        let stories = extractor("https://example.com", 6, strategy).extract(page);
        assert_eq!(
            stories,
            vec![story("Hello World", "https://example.com/1234567/a-title")],
            "strategy {}",
            strategy
        );
        let json = serde_json::to_string(&stories).unwrap();
        assert_eq!(
            json,
            r#"[{"title":"Hello World","link":"https://example.com/1234567/a-title"}]"#
        );
    }
}

#[test]
fn page_without_matching_anchors_is_empty() {
    let page = r#"<html><body><p>No links</p><a href="/about/">About</a></body></html>"#;
    for strategy in STRATEGIES {
        assert!(extractor("https://example.com", 6, strategy).extract(page).is_empty());
        assert!(extractor("https://example.com", 6, strategy).extract("").is_empty());
    }
}

#[test]
fn short_digit_runs_are_excluded() {
    let page = r#"<a href="/short/1/page">Short</a><a href="/123456/six">Six digits</a>"#;
    for strategy in STRATEGIES {
        assert!(extractor("https://example.com", 6, strategy).extract(page).is_empty());
    }
}

#[test]
fn foreign_hosts_are_excluded() {
    let page = r#"
        <a href="https://elsewhere.org/1234567/story/">Elsewhere</a>
        <a href="//cdn.example.org/7654321/story/">Protocol relative elsewhere</a>
        <a href="https://example.com/7654321/story/">Home</a>
    "#;
    for strategy in STRATEGIES {
        let stories = extractor("https://example.com", 6, strategy).extract(page);
        assert_eq!(stories, vec![story("Home", "https://example.com/7654321/story/")]);
    }
}

#[test]
fn duplicates_keep_first_position_and_title() {
    let page = r#"
        <a href="/1111111/a/">First A</a>
        <a href="/2222222/b/">B</a>
        <a href="https://example.com/1111111/a/">Second A</a>
    "#;
    for strategy in STRATEGIES {
        let stories = extractor("https://example.com", 6, strategy).extract(page);
        assert_eq!(
            stories,
            vec![
                story("First A", "https://example.com/1111111/a/"),
                story("B", "https://example.com/2222222/b/"),
            ]
        );
    }
}

#[test]
fn never_more_than_limit() {
    let page: String = (0..25)
        .map(|i| format!(r#"<a href="/{}/s/">Story {}</a>"#, 3_000_000 + i, i))
        .collect();
    for strategy in STRATEGIES {
        for limit in [1, 6, 10] {
            let stories = extractor("https://example.com", limit, strategy).extract(&page);
            assert_eq!(stories.len(), limit);
            assert_eq!(stories[0].title, "Story 0");
        }
        let all = extractor("https://example.com", 100, strategy).extract(&page);
        assert_eq!(all.len(), 25);
    }
}

#[test]
fn empty_title_anchor_leaves_href_available() {
    let page = r#"
        <a href="/1234567/x/"><img src="thumb.jpg"></a>
        <a href="/1234567/x/">  Real   headline </a>
    "#;
    for strategy in STRATEGIES {
        let stories = extractor("https://example.com", 6, strategy).extract(page);
        assert_eq!(stories, vec![story("Real headline", "https://example.com/1234567/x/")]);
    }
}

#[test]
fn unterminated_anchors_are_never_matched() {
    for strategy in STRATEGIES {
        let ex = extractor("https://example.com", 6, strategy);

        let dangling = r#"<div><a href="/1234567/dangling/">Dangling headline</div>"#;
        assert!(ex.extract(dangling).is_empty(), "strategy {}", strategy);

        let swallowing = r#"<a href="/1234567/x/">Broken <a href="/7654321/y/">Fine</a>"#;
        assert_eq!(
            ex.extract(swallowing),
            vec![story("Fine", "https://example.com/7654321/y/")],
            "strategy {}",
            strategy
        );
    }
}

#[test]
fn protocol_relative_link_on_base_host_is_accepted() {
    let page = r#"<a href="//example.com/1234567/x">Same host</a>"#;
    for strategy in STRATEGIES {
        let stories = extractor("https://example.com", 6, strategy).extract(page);
        assert_eq!(
            stories,
            vec![story("Same host", "https://example.com/1234567/x")],
            "strategy {}",
            strategy
        );
    }
}

#[test]
fn typographic_entities_decode_identically() {
    let page = r#"
        <a href="/1234567/plan/">Trump&rsquo;s Plan &mdash; Explained&hellip;</a>
        <a href="/7654321/q/?a=1&amp;b=2">&ldquo;Quoted&rdquo; &amp; caf&eacute;&nbsp;news</a>
    "#;
    let expected = vec![
        story("Trump\u{2019}s Plan \u{2014} Explained\u{2026}", "https://example.com/1234567/plan/"),
        story(
            "\u{201c}Quoted\u{201d} & caf\u{e9} news",
            "https://example.com/7654321/q/?a=1&b=2",
        ),
    ];
    for strategy in STRATEGIES {
        let stories = extractor("https://example.com", 6, strategy).extract(page);
        assert_eq!(stories, expected, "strategy {}", strategy);
    }
}

#[test]
fn non_canonical_base_url_still_matches() {
    let page = r#"<a href="/1234567/a">A</a><a href="https://example.com/7654321/b">B</a>"#;
    for base in ["https://Example.com", "https://example.com:443"] {
        for strategy in STRATEGIES {
            let stories = extractor(base, 6, strategy).extract(page);
            assert_eq!(
                stories,
                vec![
                    story("A", "https://example.com/1234567/a"),
                    story("B", "https://example.com/7654321/b"),
                ],
                "base {} strategy {}",
                base,
                strategy
            );
        }
    }
}
