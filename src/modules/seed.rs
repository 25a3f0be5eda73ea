use std::sync::LazyLock;
use std::time::Duration;

use rand::Rng;
use regex::Regex;
use reqwest::blocking::Client;
use tracing::{info, warn};

use crate::modules::error::SeedError;
use crate::modules::walk::Position;

/// Data page of the agent-framework practical; lists starting cells as
/// `<td class="y">..</td>` and `<td class="x">..</td>`.
pub const DEFAULT_SEED_URL: &str =
    "http://www.geog.leeds.ac.uk/courses/computing/practicals/python/agent-framework/part9/data.html";

static Y_CELL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"class\s*=\s*["']y["'][^>]*>([^<]*)<"#).ok());
static X_CELL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"class\s*=\s*["']x["'][^>]*>([^<]*)<"#).ok());

#[derive(Debug, Clone)]
pub struct SeedClient {
    url: String,
    http: Client,
}

impl SeedClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, SeedError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            url: url.into(),
            http,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn fetch(&self, count: usize) -> Result<Vec<Position>, SeedError> {
        let response = self.http.get(&self.url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(SeedError::Status(status.as_u16()));
        }
        let body = response.text()?;
        parse_seed_page(&body, count)
    }
}

/// Pair the i-th `y` cell with the i-th `x` cell, for the first `count` pairs.
pub fn parse_seed_page(html: &str, count: usize) -> Result<Vec<Position>, SeedError> {
    let ys = cell_values(Y_CELL.as_ref(), html);
    let xs = cell_values(X_CELL.as_ref(), html);
    let available = ys.len().min(xs.len());
    if available < count {
        return Err(SeedError::Insufficient {
            available,
            requested: count,
        });
    }

    ys.iter()
        .zip(xs.iter())
        .take(count)
        .map(|(y, x)| {
            let y = parse_coordinate(y)?;
            let x = parse_coordinate(x)?;
            let position = i32::try_from(x)
                .ok()
                .zip(i32::try_from(y).ok())
                .map(|(x, y)| Position::new(x, y))
                .filter(|p| p.in_domain())
                .ok_or(SeedError::OutOfDomain { x, y })?;
            Ok(position)
        })
        .collect()
}

fn cell_values<'a>(pattern: Option<&Regex>, html: &'a str) -> Vec<&'a str> {
    let Some(pattern) = pattern else {
        return Vec::new();
    };
    pattern
        .captures_iter(html)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .collect()
}

fn parse_coordinate(raw: &str) -> Result<i64, SeedError> {
    raw.parse::<i64>()
        .map_err(|_| SeedError::Unparsable(raw.to_string()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Seeded,
    Random,
}

/// Starting cells for the flock: the seed source when it delivers, random
/// cells otherwise. The second value says which one happened.
pub fn place_flock<R: Rng + ?Sized>(
    client: Option<&SeedClient>,
    count: usize,
    rng: &mut R,
) -> (Vec<Position>, Placement) {
    if let Some(client) = client.filter(|_| count > 0) {
        match client.fetch(count) {
            Ok(seeds) => {
                info!(url = client.url(), count, "placed flock from seed source");
                return (seeds, Placement::Seeded);
            }
            Err(err) => {
                warn!(url = client.url(), error = %err, "seed retrieval failed; placing flock randomly");
            }
        }
    }
    let cells = (0..count).map(|_| Position::random(rng)).collect();
    (cells, Placement::Random)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const PAGE: &str = r#"
        <table>
        <tr><td class="y">12</td><td class="x">47</td></tr>
        <tr><td class="y"> 3 </td><td class="x">100</td></tr>
        <tr><td class='y'>88</td><td class='x'>0</td></tr>
        </table>
    "#;

    #[test]
    fn pairs_y_and_x_cells_in_order() {
        let seeds = parse_seed_page(PAGE, 3).unwrap();
        assert_eq!(
            seeds,
            vec![
                Position::new(47, 12),
                Position::new(100, 3),
                Position::new(0, 88)
            ]
        );
    }

    #[test]
    fn takes_only_what_is_needed() {
        assert_eq!(parse_seed_page(PAGE, 1).unwrap(), vec![Position::new(47, 12)]);
        assert!(parse_seed_page(PAGE, 0).unwrap().is_empty());
    }

    #[test]
    fn short_page_is_an_error() {
        assert!(matches!(
            parse_seed_page(PAGE, 4),
            Err(SeedError::Insufficient {
                available: 3,
                requested: 4
            })
        ));
    }

    #[test]
    fn bad_values_are_errors() {
        let page = r#"<td class="y">abc</td><td class="x">1</td>"#;
        assert!(matches!(parse_seed_page(page, 1), Err(SeedError::Unparsable(_))));

        let page = r#"<td class="y">101</td><td class="x">1</td>"#;
        assert!(matches!(
            parse_seed_page(page, 1),
            Err(SeedError::OutOfDomain { x: 1, y: 101 })
        ));
    }

    #[test]
    fn unreachable_source_falls_back_to_random() {
        let client = SeedClient::new("http://127.0.0.1:9/seeds", Duration::from_millis(200)).unwrap();
        let mut rng = StdRng::seed_from_u64(6);
        let (cells, placement) = place_flock(Some(&client), 8, &mut rng);
        assert_eq!(placement, Placement::Random);
        assert_eq!(cells.len(), 8);
        assert!(cells.iter().all(|p| p.in_domain()));
    }

    #[test]
    fn no_client_means_random() {
        let mut rng = StdRng::seed_from_u64(6);
        let (cells, placement) = place_flock(None, 3, &mut rng);
        assert_eq!(placement, Placement::Random);
        assert_eq!(cells.len(), 3);
    }
}
