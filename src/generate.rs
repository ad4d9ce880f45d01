//! HTML site generation.
//!
//! Stage 2 of the build. Takes the loaded records and writes every page
//! kind through a [`SiteWriter`], wrapping each content fragment in the
//! site template via [`Renderer`].
//!
//! ## Generated Pages
//!
//! - **Landing page** (`/`): search box, region selector and region
//!   quick-links; the table is filled client-side from the data feed
//! - **About page** (`/about/`): record count and source file
//! - **Region index** (`/regions/`): every region with its record count
//! - **Region pages** (`/regions/<slug>/`): the region's facilities by name
//! - **Detail pages** (`/p/<id>/`): one per record, with map search links
//! - **Data feed** (`/data/parking.json`): all records in source order
//!
//! ## Output Structure
//!
//! ```text
//! site/
//! ├── index.html
//! ├── about/index.html
//! ├── regions/
//! │   ├── index.html
//! │   ├── 서울/index.html
//! │   └── 부산/index.html
//! ├── p/
//! │   └── 3f2a9c01de/index.html
//! └── data/parking.json
//! ```
//!
//! ## HTML Generation
//!
//! Content fragments are built with [maud](https://maud.lambda.xyz/), so
//! every value taken from the source table is escaped. Only the fixed search
//! script is emitted raw.

use crate::render::{PageMeta, Renderer};
use crate::search::{DATA_FEED_PATH, SEARCH_JS};
use crate::slug::RegionSlugs;
use crate::types::Record;
use crate::writer::{SiteWriter, WriteError};
use maud::{Markup, PreEscaped, html};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error(transparent)]
    Write(#[from] WriteError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Region quick-links shown on the landing page.
pub const LANDING_REGION_LINKS: usize = 60;

/// Rows shown in a region page table.
pub const REGION_PAGE_ROWS: usize = 500;

const NAVER_MAP_SEARCH: &str = "https://map.naver.com/v5/search/";
const KAKAO_MAP_SEARCH: &str = "https://map.kakao.com/link/search/";

/// Records grouped by region label.
///
/// Groups iterate in alphabetical region order; inside a group, records keep
/// source order.
pub fn group_by_region(records: &[Record]) -> BTreeMap<&str, Vec<&Record>> {
    let mut groups: BTreeMap<&str, Vec<&Record>> = BTreeMap::new();
    for record in records {
        groups.entry(record.region.as_str()).or_default().push(record);
    }
    groups
}

/// Site path of a region page.
pub fn region_path(slug: &str) -> String {
    format!("/regions/{slug}/")
}

/// Site path of a facility detail page.
pub fn detail_path(id: &str) -> String {
    format!("/p/{id}/")
}

/// What was generated, for the build report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateSummary {
    pub regions: usize,
    pub detail_pages: usize,
    pub slug_collisions: Vec<(String, String)>,
}

/// Write the data feed and every page into `writer`.
///
/// `source_name` is the file name shown on the about page.
pub fn generate(
    writer: &mut SiteWriter,
    renderer: &Renderer,
    records: &[Record],
    source_name: &str,
) -> Result<GenerateSummary, GenerateError> {
    // The feed goes first; pages only reference it by URL.
    writer.write(DATA_FEED_PATH, data_feed(records)?)?;

    let groups = group_by_region(records);
    let slugs = RegionSlugs::assign(groups.keys().copied());
    let site_name = renderer.config().site_name.as_str();

    let landing = render_landing(site_name, &groups, &slugs);
    let page = renderer.render(
        PageMeta {
            title: site_name,
            description: &renderer.config().site_tagline,
        },
        &landing.into_string(),
    );
    writer.write_page("/", &page)?;
    tracing::debug!("generated landing page");

    let about = render_about(source_name, records.len());
    let page = renderer.render(
        PageMeta {
            title: &format!("소개 | {site_name}"),
            description: "사이트 소개",
        },
        &about.into_string(),
    );
    writer.write_page("/about/", &page)?;

    let index = render_region_index(&groups, &slugs);
    let page = renderer.render(
        PageMeta {
            title: &format!("지역별 | {site_name}"),
            description: "지역별 목록",
        },
        &index.into_string(),
    );
    writer.write_page("/regions/", &page)?;

    for (region, members) in &groups {
        let content = render_region_page(region, members);
        let page = renderer.render(
            PageMeta {
                title: &format!("{region} | {site_name}"),
                description: &format!("{region} 공영주차장 목록"),
            },
            &content.into_string(),
        );
        writer.write_page(&region_path(&slugs.get(region)), &page)?;
    }
    tracing::info!(regions = groups.len(), "generated region pages");

    // Rows sharing an id land on the same page; the last one wins.
    let mut detail_ids = BTreeSet::new();
    for record in records {
        detail_ids.insert(record.id.as_str());
        let content = render_detail(record);
        let page = renderer.render(
            PageMeta {
                title: &format!("{} | {site_name}", record.name),
                description: &format!("{} {} 공영주차장 정보", record.region, record.address),
            },
            &content.into_string(),
        );
        writer.write_page(&detail_path(&record.id), &page)?;
    }
    tracing::info!(pages = detail_ids.len(), "generated detail pages");

    Ok(GenerateSummary {
        regions: groups.len(),
        detail_pages: detail_ids.len(),
        slug_collisions: slugs.collisions().to_vec(),
    })
}

/// JSON array of all records, in source order, non-ASCII kept as-is.
pub fn data_feed(records: &[Record]) -> Result<String, serde_json::Error> {
    serde_json::to_string(records)
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Landing page: search UI plus region shortcuts.
fn render_landing(
    site_name: &str,
    groups: &BTreeMap<&str, Vec<&Record>>,
    slugs: &RegionSlugs,
) -> Markup {
    html! {
        div.card {
            h1.h1 { (site_name) }
            div.notice {
                "키워드를 입력하면 이름/주소/기관 기준으로 필터링됩니다."
            }
        }
        div.grid {
            div.card {
                h2.h2 { "검색" }
                input id="q" class="input" placeholder="예: 서울 중구 / 부산역 / 태화강 / 주차장명...";
                div style="height:10px" {}
                select id="region" class="input" {
                    option value="" { "전체 지역" }
                    @for region in groups.keys() {
                        option value=(region) { (region) }
                    }
                }
                div style="height:12px" {}
                div.muted.small id="count" {}
                div style="height:10px" {}
                table.table id="tbl" {
                    thead { tr { th { "이름" } th { "주소" } th { "유형" } } }
                    tbody {}
                }
            }
            div.card {
                h2.h2 { "지역별 바로가기" }
                div.btnrow {
                    @for region in groups.keys().take(LANDING_REGION_LINKS) {
                        a.btn href=(region_path(&slugs.get(region))) { (region) }
                    }
                }
                div style="height:12px" {}
                div.muted.small { "지역이 너무 많으면 일부만 표시됩니다." }
            }
        }
        script { (PreEscaped(SEARCH_JS)) }
    }
}

fn render_about(source_name: &str, record_count: usize) -> Markup {
    html! {
        div.card {
            h1.h1 { "소개" }
            p.notice {
                "이 사이트는 공공데이터를 “검색하기 쉽게 정리”해서 보여주는 서비스입니다."
                br;
                "현재 데이터 파일: " b { (source_name) } " / 레코드 수: " b { (record_count) }
            }
            div.card {
                div.notice {
                    "운영 안내" br;
                    "- 데이터 파일을 교체하고 다시 빌드하면 모든 페이지가 갱신됩니다." br;
                    "- 출처표시/이용허락범위 표기를 확인하고 푸터에 출처를 남기세요." br;
                    "- 요금/운영시간은 지자체별로 다를 수 있습니다."
                }
            }
        }
    }
}

fn render_region_index(groups: &BTreeMap<&str, Vec<&Record>>, slugs: &RegionSlugs) -> Markup {
    html! {
        div.card {
            h1.h1 { "지역별" }
            p.notice { "지역을 클릭하면 해당 지역의 공영주차장 목록을 볼 수 있습니다." }
            div.btnrow {
                @for (region, members) in groups {
                    a.btn href=(region_path(&slugs.get(region))) {
                        (region) " " span.muted { "(" (members.len()) ")" }
                    }
                }
            }
        }
    }
}

/// Region page: members sorted by name, at most [`REGION_PAGE_ROWS`] rows,
/// with the true total in the notice.
fn render_region_page(region: &str, members: &[&Record]) -> Markup {
    let mut sorted = members.to_vec();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));

    html! {
        div.card {
            h1.h1 { (region) }
            p.notice { "총 " (sorted.len()) "개 (최대 " (REGION_PAGE_ROWS) "개 표시)" }
            table.table {
                thead { tr { th { "이름" } th { "주소" } th { "유형" } } }
                tbody {
                    @for record in sorted.iter().take(REGION_PAGE_ROWS) {
                        tr {
                            td { a href=(detail_path(&record.id)) { (record.name) } }
                            td { (record.address) }
                            td { (record.kind) }
                        }
                    }
                }
            }
        }
    }
}

/// Naver/Kakao map search buttons, or `None` when there is nothing to search.
fn map_links(record: &Record) -> Option<Markup> {
    let query = record.map_query();
    if query.is_empty() {
        return None;
    }
    Some(html! {
        div.btnrow {
            a.btn href={ (NAVER_MAP_SEARCH) (query) } target="_blank" rel="noopener" { "네이버지도" }
            a.btn href={ (KAKAO_MAP_SEARCH) (query) } target="_blank" rel="noopener" { "카카오지도" }
        }
    })
}

fn render_detail(record: &Record) -> Markup {
    html! {
        div.card {
            h1.h1 { (record.name) }
            div.badge { (record.region) }
            div.kv {
                div { "주소" } div { (record.address) }
                div { "유형" } div { (record.kind) }
                div { "기관" } div { (record.org) }
                div { "전화" } div { (record.phone) }
                div { "좌표" } div { (record.lat) ", " (record.lon) }
            }
            @if let Some(links) = map_links(record) {
                (links)
            }
            div style="height:12px" {}
            div.notice {
                "※ 요금/운영시간은 지자체별로 다를 수 있습니다. 지도/공식 안내를 반드시 확인하세요."
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
