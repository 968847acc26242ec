// tests/reddit_listing.rs
use deal_alerts::feed::reddit::parse_listing;
use deal_alerts::{classify, Category};

#[test]
fn fixture_listing_parses_in_feed_order() {
    let body = include_str!("fixtures/reddit_new.json");
    let posts = parse_listing(body).expect("listing parses");
    let ids: Vec<&str> = posts.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["1g0d001", "1g0d002", "1g0d003", "1g0d004", "1g0d005"]
    );
    assert_eq!(posts[3].url, "https://deals.example/p365xl");
}

#[test]
fn fixture_titles_classify_as_expected() {
    let body = include_str!("fixtures/reddit_new.json");
    let posts = parse_listing(body).unwrap();
    let cats: Vec<Vec<Category>> = posts.iter().map(|p| classify(&p.title)).collect();
    assert_eq!(
        cats,
        vec![
            vec![Category::Ammo],
            vec![Category::Ammo, Category::Rifle],
            vec![],
            vec![Category::Handgun],
            vec![Category::Handgun],
        ]
    );
}
