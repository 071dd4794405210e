use serde::Serialize;

/// Romaji label of the national total row in the MHLW tables.
pub const NATIONAL_ROMAJI: &str = "ALL";
pub const NATIONAL_KANJI: &str = "全国";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefectureNotFoundError {
    pub prefecture: String,
    pub message: String,
}

impl PrefectureNotFoundError {
    pub fn new(prefecture: &str, message: &str) -> Self {
        Self {
            prefecture: prefecture.to_string(),
            message: message.to_string(),
        }
    }
}

impl std::fmt::Display for PrefectureNotFoundError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: '{}'", self.message, self.prefecture)
    }
}

impl std::error::Error for PrefectureNotFoundError {}

/// A Japanese prefecture.
///
/// # Fields
/// * `code` - JIS X 0401 code, 1 (Hokkaido) to 47 (Okinawa)
/// * `kanji` - Name as shown in the published artifact
/// * `romaji` - Name used by the `Prefecture` column of the MHLW tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Prefecture {
    pub code: u8,
    pub kanji: &'static str,
    pub romaji: &'static str,
}

impl Prefecture {
    const fn new(code: u8, kanji: &'static str, romaji: &'static str) -> Self {
        Self {
            code,
            kanji,
            romaji,
        }
    }
}

pub const PREFECTURES: &[Prefecture] = &[
    Prefecture::new(1, "北海道", "Hokkaido"),
    Prefecture::new(2, "青森県", "Aomori"),
    Prefecture::new(3, "岩手県", "Iwate"),
    Prefecture::new(4, "宮城県", "Miyagi"),
    Prefecture::new(5, "秋田県", "Akita"),
    Prefecture::new(6, "山形県", "Yamagata"),
    Prefecture::new(7, "福島県", "Fukushima"),
    Prefecture::new(8, "茨城県", "Ibaraki"),
    Prefecture::new(9, "栃木県", "Tochigi"),
    Prefecture::new(10, "群馬県", "Gunma"),
    Prefecture::new(11, "埼玉県", "Saitama"),
    Prefecture::new(12, "千葉県", "Chiba"),
    Prefecture::new(13, "東京都", "Tokyo"),
    Prefecture::new(14, "神奈川県", "Kanagawa"),
    Prefecture::new(15, "新潟県", "Niigata"),
    Prefecture::new(16, "富山県", "Toyama"),
    Prefecture::new(17, "石川県", "Ishikawa"),
    Prefecture::new(18, "福井県", "Fukui"),
    Prefecture::new(19, "山梨県", "Yamanashi"),
    Prefecture::new(20, "長野県", "Nagano"),
    Prefecture::new(21, "岐阜県", "Gifu"),
    Prefecture::new(22, "静岡県", "Shizuoka"),
    Prefecture::new(23, "愛知県", "Aichi"),
    Prefecture::new(24, "三重県", "Mie"),
    Prefecture::new(25, "滋賀県", "Shiga"),
    Prefecture::new(26, "京都府", "Kyoto"),
    Prefecture::new(27, "大阪府", "Osaka"),
    Prefecture::new(28, "兵庫県", "Hyogo"),
    Prefecture::new(29, "奈良県", "Nara"),
    Prefecture::new(30, "和歌山県", "Wakayama"),
    Prefecture::new(31, "鳥取県", "Tottori"),
    Prefecture::new(32, "島根県", "Shimane"),
    Prefecture::new(33, "岡山県", "Okayama"),
    Prefecture::new(34, "広島県", "Hiroshima"),
    Prefecture::new(35, "山口県", "Yamaguchi"),
    Prefecture::new(36, "徳島県", "Tokushima"),
    Prefecture::new(37, "香川県", "Kagawa"),
    Prefecture::new(38, "愛媛県", "Ehime"),
    Prefecture::new(39, "高知県", "Kochi"),
    Prefecture::new(40, "福岡県", "Fukuoka"),
    Prefecture::new(41, "佐賀県", "Saga"),
    Prefecture::new(42, "長崎県", "Nagasaki"),
    Prefecture::new(43, "熊本県", "Kumamoto"),
    Prefecture::new(44, "大分県", "Oita"),
    Prefecture::new(45, "宮崎県", "Miyazaki"),
    Prefecture::new(46, "鹿児島県", "Kagoshima"),
    Prefecture::new(47, "沖縄県", "Okinawa"),
];

/// Get a prefecture by its code.
///
/// # Example
/// ```rust
/// use covid_data::models::prefectures::by_code;
///
/// assert_eq!(by_code(13).unwrap().kanji, "東京都");
/// assert!(by_code(48).is_err());
/// ```
pub fn by_code(code: u8) -> Result<&'static Prefecture, PrefectureNotFoundError> {
    PREFECTURES
        .iter()
        .find(|pref| pref.code == code)
        .ok_or_else(|| PrefectureNotFoundError::new(&code.to_string(), "Unknown prefecture code"))
}

pub fn by_kanji(kanji: &str) -> Result<&'static Prefecture, PrefectureNotFoundError> {
    let kanji = kanji.trim();
    PREFECTURES
        .iter()
        .find(|pref| pref.kanji == kanji)
        .ok_or_else(|| PrefectureNotFoundError::new(kanji, "Unknown prefecture name"))
}

/// Get a prefecture by its romaji name (case insensitive).
pub fn by_romaji(romaji: &str) -> Result<&'static Prefecture, PrefectureNotFoundError> {
    let romaji = romaji.trim();
    PREFECTURES
        .iter()
        .find(|pref| pref.romaji.eq_ignore_ascii_case(romaji))
        .ok_or_else(|| PrefectureNotFoundError::new(romaji, "Unknown prefecture romaji"))
}

/// Completes a bare prefecture name with its suffix.
///
/// Tokyo takes 都, Kyoto and Osaka take 府, Hokkaido keeps its name,
/// everything else takes 県.
///
/// # Example
/// ```rust
/// use covid_data::models::prefectures::add_pref_suffix;
///
/// assert_eq!(add_pref_suffix("東京"), "東京都");
/// assert_eq!(add_pref_suffix("京都"), "京都府");
/// assert_eq!(add_pref_suffix("北海道"), "北海道");
/// assert_eq!(add_pref_suffix("青森"), "青森県");
/// ```
pub fn add_pref_suffix(name: &str) -> String {
    let name = name.trim();
    match name {
        "東京" => "東京都".to_string(),
        "京都" | "大阪" => format!("{name}府"),
        "北海道" => name.to_string(),
        _ if name.ends_with(['都', '道', '府', '県']) => name.to_string(),
        _ => format!("{name}県"),
    }
}
