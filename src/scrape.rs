use std::sync::LazyLock;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};

use crate::fetch::LotterySource;
use crate::types::{DauDuoi, DauDuoiEntry, LotteryData, Prizes, Tier};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

const XSKT_NAME: &str = "xskt.com.vn";
const XSKT_URL: &str = "https://xskt.com.vn/xshcm-xstp";
const XOSO_NAME: &str = "xoso.com.vn";
const XOSO_URL: &str = "https://xoso.com.vn/xo-so-tphcm/xshcm-p1.html";
const MINHNGOC_NAME: &str = "minhngoc.net.vn";
const MINHNGOC_URL: &str = "https://www.minhngoc.net.vn/ket-qua-xo-so/mien-nam/tp-hcm.html";

static RE_BR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());
static RE_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());
static RE_WS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static RE_NUMBER_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{2,6}").unwrap());
static RE_DATE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2}[-/]\d{1,2})").unwrap());
static RE_PRIZE_LABEL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(G\d|ĐB|DB)$").unwrap());
static RE_SINGLE_DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d$").unwrap());

fn build_client() -> Client {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(FETCH_TIMEOUT)
        .build()
        .expect("Failed to build HTTP client")
}

fn element_text(el: &ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Keep a token only if its digits form a ticket-sized run (2–6 digits).
fn clean_number(token: &str) -> Option<String> {
    let digits: String = token.chars().filter(|c| c.is_ascii_digit()).collect();
    if (2..=6).contains(&digits.len()) {
        Some(digits)
    } else {
        None
    }
}

/// Pull tickets out of a cell's inner HTML: `<br>` acts as a separator,
/// all other markup is stripped before splitting on whitespace.
fn numbers_from_html(cell_html: &str) -> Vec<String> {
    let no_br = RE_BR.replace_all(cell_html, " ");
    let no_tags = RE_TAG.replace_all(&no_br, " ");
    let normalized = RE_WS.replace_all(&no_tags, " ");
    normalized
        .trim()
        .split(' ')
        .filter_map(clean_number)
        .collect()
}

/// Last-resort extraction: scan raw cell text for digit runs.
fn numbers_from_text(text: &str) -> Vec<String> {
    RE_NUMBER_RUN
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Map an upper-cased first-cell label onto a tier. Understands the short
/// codes (G8..G1, ĐB/DB), the full Vietnamese prize names, and the bare
/// digit labels the backup pages use.
fn match_tier(label: &str) -> Option<Tier> {
    if label.contains("G8") || label == "8" || label.contains("GIẢI TÁM") {
        Some(Tier::G8)
    } else if label.contains("G7") || label == "7" || label.contains("GIẢI BẢY") {
        Some(Tier::G7)
    } else if label.contains("G6") || label == "6" || label.contains("GIẢI SÁU") {
        Some(Tier::G6)
    } else if label.contains("G5") || label == "5" || label.contains("GIẢI NĂM") {
        Some(Tier::G5)
    } else if label.contains("G4") || label == "4" || label.contains("GIẢI TƯ") {
        Some(Tier::G4)
    } else if label.contains("G3") || label == "3" || label.contains("GIẢI BA") {
        Some(Tier::G3)
    } else if label.contains("G2") || label == "2" || label.contains("GIẢI NHÌ") {
        Some(Tier::G2)
    } else if label.contains("G1") || label == "1" || label.contains("GIẢI NHẤT") {
        Some(Tier::G1)
    } else if label.contains("ĐB") || label.contains("DB") || label.contains("ĐẶC BIỆT") {
        Some(Tier::Db)
    } else {
        None
    }
}

/// G4 spans several rows on some layouts; repeated G4 rows accumulate.
/// Every other tier takes the latest row as-is.
fn assign_numbers(prizes: &mut Prizes, tier: Tier, numbers: Vec<String>) {
    match tier {
        Tier::G4 if !prizes.g4.is_empty() => prizes.g4.extend(numbers),
        _ => *prizes.tier_mut(tier) = numbers,
    }
}

// ==================== xskt.com.vn (primary) ====================
//
// Row shape on the live page:
//   <tr><td title="Giải tám">G8</td><td><p>20</p></td><td>0</td><td></td></tr>
//   <tr><td title="Giải ĐB">ĐB</td><td><em>683111</em></td><td>9</td><td>2, 8</td></tr>

pub struct XsktSource {
    client: Client,
}

impl XsktSource {
    pub fn new() -> Self {
        Self {
            client: build_client(),
        }
    }

    async fn try_fetch(&self) -> Result<LotteryData> {
        tracing::info!("Fetching from {}: {}", XSKT_NAME, XSKT_URL);

        let response = self
            .client
            .get(XSKT_URL)
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            )
            .header("Accept-Language", "vi-VN,vi;q=0.9,en;q=0.8")
            .header("Referer", "https://xskt.com.vn/")
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        Ok(parse_xskt(&body))
    }
}

impl Default for XsktSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LotterySource for XsktSource {
    fn name(&self) -> &'static str {
        XSKT_NAME
    }

    async fn fetch(&self) -> Option<LotteryData> {
        match self.try_fetch().await {
            Ok(data) => Some(data),
            Err(e) => {
                tracing::warn!("XSKT error: {}", e);
                None
            }
        }
    }
}

pub fn parse_xskt(html: &str) -> LotteryData {
    let document = Html::parse_document(html);
    let mut result = LotteryData::empty(XSKT_NAME);

    // Date comes from the per-day link inside the results block ("XSHCM 26-1").
    let date_link_sel = Selector::parse(r#"a[href*="/xshcm-xstp/ngay-"]"#).unwrap();
    let date_text = document
        .select(&date_link_sel)
        .next()
        .map(|a| element_text(&a))
        .unwrap_or_default();
    result.date = match RE_DATE_TOKEN.captures(&date_text) {
        Some(caps) => format!("Xổ số TP.HCM ngày {}", caps[1].replace('-', "/")),
        None => "Xổ số TP.HCM - Kết quả mới nhất".to_string(),
    };

    let table_sel = Selector::parse("table.result").unwrap();
    let row_sel = Selector::parse("tr").unwrap();
    let cell_sel = Selector::parse("td").unwrap();

    let mut dau_duoi = DauDuoi::default();

    // First table on the page is the newest draw.
    if let Some(table) = document.select(&table_sel).next() {
        for row in table.select(&row_sel) {
            let cells: Vec<ElementRef> = row.select(&cell_sel).collect();
            if cells.len() < 2 {
                continue;
            }

            let label = element_text(&cells[0]).to_uppercase();
            // Rows without a prize label (đầu–đuôi digit rows etc.) are skipped here.
            if !RE_PRIZE_LABEL.is_match(&label) {
                continue;
            }

            let mut numbers = numbers_from_html(&cells[1].inner_html());
            if numbers.is_empty() {
                let direct = RE_WS.replace_all(&element_text(&cells[1]), " ").to_string();
                numbers = direct.split(' ').filter_map(clean_number).collect();
            }

            if let Some(tier) = match_tier(&label) {
                assign_numbers(&mut result.prizes, tier, numbers);
            }
        }

        // Đầu–đuôi lives in columns 3 and 4 of the same table.
        for row in table.select(&row_sel) {
            let cells: Vec<ElementRef> = row.select(&cell_sel).collect();
            if cells.len() >= 4 {
                let dau = element_text(&cells[2]);
                let duoi = element_text(&cells[3]);
                if RE_SINGLE_DIGIT.is_match(&dau) || dau.contains(',') {
                    dau_duoi.dau.push(DauDuoiEntry {
                        num: dau,
                        values: duoi,
                    });
                }
            }
        }
    }

    result.dau_duoi = Some(dau_duoi);
    result
}

// ==================== xoso.com.vn (backup) ====================

pub struct XosoSource {
    client: Client,
}

impl XosoSource {
    pub fn new() -> Self {
        Self {
            client: build_client(),
        }
    }

    async fn try_fetch(&self) -> Result<LotteryData> {
        tracing::info!("Fetching from {}: {}", XOSO_NAME, XOSO_URL);

        let response = self
            .client
            .get(XOSO_URL)
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        Ok(parse_xoso(&body))
    }
}

impl Default for XosoSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LotterySource for XosoSource {
    fn name(&self) -> &'static str {
        XOSO_NAME
    }

    async fn fetch(&self) -> Option<LotteryData> {
        match self.try_fetch().await {
            Ok(data) => Some(data),
            Err(e) => {
                tracing::warn!("XoSo error: {}", e);
                None
            }
        }
    }
}

pub fn parse_xoso(html: &str) -> LotteryData {
    let document = Html::parse_document(html);
    let mut result = LotteryData::empty(XOSO_NAME);

    let title_sel = Selector::parse("h1, .title-kqxs").unwrap();
    let title = document
        .select(&title_sel)
        .next()
        .map(|el| element_text(&el))
        .unwrap_or_default();
    result.date = if title.is_empty() {
        "Xổ số TP.HCM".to_string()
    } else {
        title
    };

    let row_sel = Selector::parse("table tr").unwrap();
    let cell_sel = Selector::parse("td").unwrap();
    let nested_sel = Selector::parse("span, em, a").unwrap();

    for row in document.select(&row_sel) {
        let cells: Vec<ElementRef> = row.select(&cell_sel).collect();
        if cells.len() < 2 {
            continue;
        }

        let label = element_text(&cells[0]).to_uppercase();

        // Numbers sit inside nested elements on this layout.
        let mut numbers: Vec<String> = Vec::new();
        for cell in &cells[1..] {
            for el in cell.select(&nested_sel) {
                if let Some(num) = clean_number(&element_text(&el)) {
                    numbers.push(num);
                }
            }
        }
        if numbers.is_empty() {
            for cell in &cells[1..] {
                numbers.extend(numbers_from_text(&cell.text().collect::<String>()));
            }
        }

        if let Some(tier) = match_tier(&label) {
            assign_numbers(&mut result.prizes, tier, numbers);
        }
    }

    result
}

// ==================== minhngoc.net.vn (backup) ====================

pub struct MinhNgocSource {
    client: Client,
}

impl MinhNgocSource {
    pub fn new() -> Self {
        Self {
            client: build_client(),
        }
    }

    async fn try_fetch(&self) -> Result<LotteryData> {
        tracing::info!("Fetching from {}: {}", MINHNGOC_NAME, MINHNGOC_URL);

        let response = self
            .client
            .get(MINHNGOC_URL)
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        Ok(parse_minhngoc(&body))
    }
}

impl Default for MinhNgocSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LotterySource for MinhNgocSource {
    fn name(&self) -> &'static str {
        MINHNGOC_NAME
    }

    async fn fetch(&self) -> Option<LotteryData> {
        match self.try_fetch().await {
            Ok(data) => Some(data),
            Err(e) => {
                tracing::warn!("MinhNgoc error: {}", e);
                None
            }
        }
    }
}

pub fn parse_minhngoc(html: &str) -> LotteryData {
    let document = Html::parse_document(html);
    let mut result = LotteryData::empty(MINHNGOC_NAME);

    let title_sel = Selector::parse("h1, .title").unwrap();
    let title = document
        .select(&title_sel)
        .next()
        .map(|el| element_text(&el))
        .unwrap_or_default();
    result.date = if title.is_empty() {
        "Xổ số TP.HCM".to_string()
    } else {
        title
    };

    let row_sel = Selector::parse("table tr").unwrap();
    let cell_sel = Selector::parse("td").unwrap();
    let nested_sel = Selector::parse("td span, td em").unwrap();

    for row in document.select(&row_sel) {
        let cells: Vec<ElementRef> = row.select(&cell_sel).collect();
        if cells.is_empty() {
            continue;
        }

        let label = element_text(&cells[0]).to_uppercase();

        let mut numbers: Vec<String> = Vec::new();
        for el in row.select(&nested_sel) {
            if let Some(num) = clean_number(&element_text(&el)) {
                numbers.push(num);
            }
        }
        if numbers.is_empty() {
            for cell in &cells[1..] {
                numbers.extend(numbers_from_text(&cell.text().collect::<String>()));
            }
        }

        if let Some(tier) = match_tier(&label) {
            assign_numbers(&mut result.prizes, tier, numbers);
        }
    }

    result
}

/// The fixed fallback chain, highest priority first.
pub fn default_sources() -> Vec<Box<dyn LotterySource>> {
    vec![
        Box::new(XsktSource::new()),
        Box::new(XosoSource::new()),
        Box::new(MinhNgocSource::new()),
    ]
}
