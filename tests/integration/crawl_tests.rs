//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a small procurement portal and run
//! the full crawl cycle end-to-end over HTTP.

use lot_harvest::config::{Config, CrawlerConfig, OutputConfig, PortalConfig};
use lot_harvest::crawler::{crawl, NodeLevel};
use lot_harvest::output::{assemble, JsonFileOutput, OutputHandler};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock portal
fn create_test_config(base_url: &str, batch_width: usize) -> Config {
    Config {
        portal: PortalConfig {
            base_url: base_url.to_string(),
            notices_path: "/portal".to_string(),
        },
        crawler: CrawlerConfig {
            batch_width,
            wait_timeout_secs: 1,
            poll_interval_ms: 10, // Very short for testing
            max_listing_pages: 20,
        },
        output: OutputConfig {
            path: "unused.json".to_string(),
            write_empty: false,
        },
        ..Default::default()
    }
}

fn notice_row(id: u32, lots: u32) -> String {
    format!(
        r#"<tr>
            <td class="col-edital"><a href="/portal/edital/{id}">Edital 0800100/00000{id}/2024 SRF</a></td>
            <td>Receita</td>
            <td><span>01/03/2024</span></td>
            <td class="hidden-xs">15/03/2024</td>
            <td class="hidden-xs">{lots} lotes</td>
        </tr>"#
    )
}

fn notice_listing(rows: &[String]) -> String {
    format!(
        "<html><body><table><tbody>{}</tbody></table></body></html>",
        rows.concat()
    )
}

fn lot_row(number: u32) -> String {
    format!(
        r#"<tr>
            <td class="text-left"><a>Lote {number}</a></td>
            <td class="text-right"><div class="valor-lote">R$ {number}00,00</div></td>
            <td>Venda</td>
            <td>Aberto</td>
            <td class="text-center"><a><span>0</span></a></td>
        </tr>"#
    )
}

/// A lot listing page; `next` is the href of the next page, if any
fn lot_listing(numbers: &[u32], next: Option<&str>) -> String {
    let rows: String = numbers.iter().map(|n| lot_row(*n)).collect();
    let pagination = match next {
        Some(href) => format!(r#"<li class="pagination-next"><a href="{href}">Próxima</a></li>"#),
        None => r##"<li class="pagination-next disabled"><a href="#">Próxima</a></li>"##.to_string(),
    };
    format!(
        r#"<html><body>
            <table class="table table-striped"><tbody>{rows}</tbody></table>
            <ul class="pagination">{pagination}</ul>
        </body></html>"#
    )
}

fn lot_detail(items: &[&str]) -> String {
    let rows: String = items
        .iter()
        .map(|item| {
            format!("<tr><td>Depósito SP</td><td>1</td><td>UN</td><td>{item}</td></tr>")
        })
        .collect();
    format!(
        r#"<html><body><table class="table table-striped"><tbody>{rows}</tbody></table></body></html>"#
    )
}

async fn serve(server: &MockServer, route: &str, status: u16, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_nests_notices_lots_and_details() {
    let mock_server = MockServer::start().await;

    serve(
        &mock_server,
        "/portal",
        200,
        notice_listing(&[notice_row(1, 2), notice_row(2, 0)]),
    )
    .await;

    // Notice 1: two lots spread over two listing pages
    serve(
        &mock_server,
        "/portal/edital/1",
        200,
        lot_listing(&[1], Some("/portal/edital/1/pagina/2")),
    )
    .await;
    serve(
        &mock_server,
        "/portal/edital/1/pagina/2",
        200,
        lot_listing(&[2], None),
    )
    .await;
    serve(
        &mock_server,
        "/portal/edital/1/lote/1",
        200,
        lot_detail(&["Relógios", "Perfumes"]),
    )
    .await;
    serve(
        &mock_server,
        "/portal/edital/1/lote/2",
        200,
        lot_detail(&["Notebooks"]),
    )
    .await;

    // Notice 2: a lot listing with no rows
    serve(&mock_server, "/portal/edital/2", 200, lot_listing(&[], None)).await;

    let config = create_test_config(&mock_server.uri(), 1);
    let report = crawl(&config).await.expect("Crawl setup failed");

    assert!(report.failures.is_empty(), "{:?}", report.failures);
    assert_eq!(report.notices.len(), 2);

    let first = &report.notices[0];
    assert_eq!(first.link, format!("{}/portal/edital/1", mock_server.uri()));
    assert_eq!(first.code, "Edital 0800100/000001/2024 SRF");
    assert_eq!(first.description, "SRF");
    assert_eq!(first.start_date, "01/03/2024");
    assert_eq!(first.end_date, "15/03/2024");
    assert_eq!(first.lots, 2);

    let lots: Vec<&str> = first.lots_details.iter().map(|l| l.lot.as_str()).collect();
    assert_eq!(lots, vec!["Lote 1", "Lote 2"]);

    let lot = &first.lots_details[0];
    assert_eq!(lot.min_price, "R$ 100,00");
    assert_eq!(lot.kind, "Venda");
    assert_eq!(lot.status, "Aberto");
    assert_eq!(
        lot.link.as_deref(),
        Some(format!("{}/portal/edital/1/lote/1", mock_server.uri()).as_str())
    );
    assert_eq!(lot.lot_table.len(), 2);
    assert_eq!(lot.lot_table[0].venue, "Depósito SP");
    assert_eq!(lot.lot_table[0].unit, "UN");
    assert_eq!(lot.lot_table[1].description, "Perfumes");
    assert_eq!(first.lots_details[1].lot_table[0].description, "Notebooks");

    let second = &report.notices[1];
    assert_eq!(second.lots, 0);
    assert!(second.lots_details.is_empty());
}

#[tokio::test]
async fn test_failed_lot_detail_keeps_siblings() {
    let mock_server = MockServer::start().await;

    serve(&mock_server, "/portal", 200, notice_listing(&[notice_row(7, 3)])).await;
    serve(
        &mock_server,
        "/portal/edital/7",
        200,
        lot_listing(&[1, 2, 3], None),
    )
    .await;
    serve(&mock_server, "/portal/edital/7/lote/1", 200, lot_detail(&["A"])).await;
    serve(
        &mock_server,
        "/portal/edital/7/lote/2",
        500,
        "Internal Server Error".to_string(),
    )
    .await;
    serve(&mock_server, "/portal/edital/7/lote/3", 200, lot_detail(&["C"])).await;

    let config = create_test_config(&mock_server.uri(), 3);
    let report = crawl(&config).await.expect("Crawl setup failed");

    let lots = &report.notices[0].lots_details;
    assert_eq!(lots.len(), 3);
    assert_eq!(lots[0].lot_table.len(), 1);
    assert!(lots[1].lot_table.is_empty());
    assert_eq!(lots[2].lot_table[0].description, "C");

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].level, NodeLevel::LotDetail);
    assert!(report.failures[0].locator.ends_with("/portal/edital/7/lote/2"));
}

#[tokio::test]
async fn test_unreachable_notice_listing_yields_empty_report() {
    let mock_server = MockServer::start().await;

    serve(&mock_server, "/portal", 503, "Unavailable".to_string()).await;

    let config = create_test_config(&mock_server.uri(), 5);
    let report = crawl(&config).await.expect("Crawl setup failed");

    assert!(report.notices.is_empty());
    assert_eq!(report.failures_at(NodeLevel::NoticeListing), 1);
    assert!(report.finished_at.is_some());
}

#[tokio::test]
async fn test_crawl_result_written_as_json() {
    let mock_server = MockServer::start().await;

    serve(&mock_server, "/portal", 200, notice_listing(&[notice_row(3, 1)])).await;
    serve(&mock_server, "/portal/edital/3", 200, lot_listing(&[4], None)).await;
    serve(
        &mock_server,
        "/portal/edital/3/lote/4",
        200,
        lot_detail(&["Cadeiras"]),
    )
    .await;

    let config = create_test_config(&mock_server.uri(), 2);
    let report = crawl(&config).await.expect("Crawl setup failed");

    let dir = tempfile::tempdir().unwrap();
    let out_path = dir.path().join("full_notices.json");
    JsonFileOutput::new(&out_path)
        .write(&assemble(report))
        .unwrap();

    let content = std::fs::read_to_string(&out_path).unwrap();
    assert!(content.starts_with("[\n    {"));

    let value: serde_json::Value = serde_json::from_str(&content).unwrap();
    let notices = value.as_array().unwrap();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0]["lots_details"][0]["lot"], "Lote 4");
    assert_eq!(notices[0]["lots_details"][0]["type"], "Venda");
    assert_eq!(
        notices[0]["lots_details"][0]["lot_table"][0]["description"],
        "Cadeiras"
    );
}
