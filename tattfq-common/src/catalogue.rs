//! The TATTFQ survey instrument
//!
//! Fixed catalogue of 34 questionnaire items grouped into 9 dimensions,
//! plus the Likert label tables and the enumerated respondent-profile
//! option sets. All of it is defined at process start and immutable;
//! insertion order is significant and drives every derived index, so
//! statistics and exports come out in a deterministic order.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// One questionnaire item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Item {
    /// Full dimension name this item belongs to
    pub dimension: &'static str,
    /// Stable unique item code (e.g. "DSI1")
    pub code: &'static str,
    /// Statement shown to the respondent
    pub prompt: &'static str,
}

/// A dimension: a named group of catalogue items
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    /// Full dimension name
    pub name: &'static str,
    /// Short abbreviation used as the external identifier (e.g. "DSI")
    pub abbr: &'static str,
    /// Item codes in catalogue order
    pub codes: Vec<&'static str>,
}

/// Inclusive Likert scale bounds
pub const LIKERT_MIN: u8 = 1;
pub const LIKERT_MAX: u8 = 6;

/// Agreement wording for the performance scale, index 0 = rating 1
pub const LIKERT_PERFORMANCE: [&str; 6] = [
    "Sangat Tidak Setuju",
    "Tidak Setuju",
    "Agak Tidak Setuju",
    "Agak Setuju",
    "Setuju",
    "Sangat Setuju",
];

/// Importance wording for the importance scale, index 0 = rating 1
pub const LIKERT_IMPORTANCE: [&str; 6] = [
    "Sangat Tidak Penting",
    "Tidak Penting",
    "Agak Tidak Penting",
    "Agak Penting",
    "Penting",
    "Sangat Penting",
];

/// (dimension, code, prompt) triples in instrument order
const ITEMS: &[(&str, &str, &str)] = &[
    // Data & Services Integration
    ("Data & Services Integration", "DSI1",
     "Aplikasi telemedicine memungkinkan informasi terkait telekonsultasi klinis (hasil anamnesis, diagnosis, pemeriksaan fisik, penelaahan hasil pemeriksaan penunjang, anjuran, edukasi, pengobatan, dan/atau rujukan yang diberikan) dapat tercatat secara tepat dalam rekam medis pasien sesuai dengan ketentuan peraturan perundang-undangan"),
    ("Data & Services Integration", "DSI2",
     "Aplikasi telemedicine dapat terhubung dengan sistem informasi atau platform lain, untuk mengirim dan/atau menerima rekam medis pasien"),
    ("Data & Services Integration", "DSI3",
     "Aplikasi telemedicine terhubung dengan fasilitas pelayanan kefarmasian dan/atau fasilitas pelayanan kesehatan sehingga dapat memfasilitasi layanan yang terintegrasi"),
    ("Data & Services Integration", "DSI4",
     "Aplikasi telemedicine dapat terhubung dengan alat medis untuk mengirimkan data tanda vital pasien secara real-time"),
    ("Data & Services Integration", "DSI5",
     "Aplikasi telemedicine menyediakan data penting yang saya perlukan dalam memberikan layanan kesehatan jarak jauh"),
    // Clinical Decision Support
    ("Clinical Decision Support", "CDS1",
     "Aplikasi telemedicine dapat secara otomatis memberikan rekomendasi diagnosis, anjuran, edukasi, dan/atau penatalaksanaan pasien (termasuk pengobatan) kepada dokter berdasarkan data dan hasil pemeriksaan pasien"),
    ("Clinical Decision Support", "CDS2",
     "Aplikasi telemedicine dapat secara otomatis mencegah penulisan resep untuk obat-obat yang dikecualikan dalam peraturan pemerintah; memiliki potensi interaksi dengan obat lainnya; dan/atau tidak sesuai dengan kondisi khusus pasien, seperti alergi, hamil, menyusui, atau kondisi lainnya, sehingga hanya obat yang aman dan sesuai yang dapat diresepkan"),
    // Clinical Communication
    ("Clinical Communication", "CCM1",
     "Aplikasi telemedicine dapat memfasilitasi pertukaran informasi antar dokter, seperti informasi mengenai kondisi kesehatan dan/atau hasil pemeriksaan pasien yang dirujuk"),
    ("Clinical Communication", "CCM2",
     "Aplikasi telemedicine dapat memfasilitasi komunikasi antar dokter, misalnya untuk mendiskusikan kondisi, diagnosis, dan/atau rencana pengobatan pasien"),
    ("Clinical Communication", "CCM3",
     "Aplikasi telemedicine memungkinkan saya untuk bertukar informasi dengan pasien, seperti bertukar informasi mengenai kondisi kesehatan dan/atau hasil pemeriksaan pasien"),
    ("Clinical Communication", "CCM4",
     "Aplikasi telemedicine memungkinkan saya untuk berkomunikasi secara langsung dengan pasien melalui pesan teks, panggilan audio, dan/atau panggilan video"),
    ("Clinical Communication", "CCM5",
     "Aplikasi telemedicine memungkinkan pasien untuk memberikan penilaian terhadap layanan dan/atau persetujuan/penolakan terhadap rekomendasi medis yang saya berikan"),
    // Clinical Task Support
    ("Clinical Task Support", "CTS1",
     "Aplikasi telemedicine memungkinkan saya, sebagai dokter yang berwenang, untuk mengakses, meninjau, dan/atau memperbarui data rekam medis pasien"),
    ("Clinical Task Support", "CTS2",
     "Aplikasi telemedicine memungkinkan saya untuk melakukan anamnesis"),
    ("Clinical Task Support", "CTS3",
     "Aplikasi telemedicine memungkinkan saya untuk melakukan pemeriksaan secara memadai melalui media audio dan/atau visual"),
    ("Clinical Task Support", "CTS4",
     "Aplikasi telemedicine memungkinkan saya untuk melakukan penelaahan hasil pemeriksaan penunjang"),
    ("Clinical Task Support", "CTS5",
     "Aplikasi telemedicine memungkinkan saya untuk memberikan anjuran dan/atau edukasi kepada pasien"),
    ("Clinical Task Support", "CTS6",
     "Aplikasi telemedicine memungkinkan saya untuk melakukan penegakan diagnosis kerja"),
    ("Clinical Task Support", "CTS7",
     "Aplikasi telemedicine memungkinkan saya untuk melakukan penatalaksanaan pasien, termasuk pemberian pengobatan"),
    ("Clinical Task Support", "CTS8",
     "Aplikasi telemedicine memungkinkan saya memberikan rujukan kepada pasien untuk melakukan pemeriksaan kesehatan lanjutan ke fasilitas pelayanan kesehatan"),
    ("Clinical Task Support", "CTS9",
     "Aplikasi telemedicine memungkinkan saya untuk memantau perkembangan kondisi pasien setelah pengobatan diberikan"),
    // Scheduling & Notification
    ("Scheduling & Notification", "SCN1",
     "Aplikasi telemedicine memungkinkan saya untuk mengatur jadwal konsultasi dan/atau follow-up dengan pasien"),
    ("Scheduling & Notification", "SCN2",
     "Aplikasi telemedicine menyediakan notifikasi yang saya butuhkan dalam memberikan layanan kesehatan jarak jauh kepada pasien"),
    // System Reliability
    ("System Reliability", "SRB1",
     "Aplikasi telemedicine yang saya gunakan dapat diandalkan untuk selalu aktif dan/atau tersedia saat saya membutuhkannya"),
    ("System Reliability", "SRB2",
     "Aplikasi telemedicine yang saya gunakan tidak sering mengalami masalah dan/atau kerusakan sistem yang tidak terduga yang dapat mengganggu saya dalam memberikan layanan kesehatan jarak jauh kepada pasien"),
    ("System Reliability", "SRB3",
     "Jika aplikasi telemedicine sedang mengalami kerusakan dan/atau perawatan sistem, terdapat jaminan bahwa aplikasi dapat digunakan kembali dalam waktu tertentu (misalnya 24 jam)"),
    // Ease of Use & Support
    ("Ease of Use & Support", "EUS1",
     "Aplikasi telemedicine mudah untuk dipelajari dan/atau digunakan"),
    ("Ease of Use & Support", "EUS2",
     "Aplikasi telemedicine menyediakan bantuan bagi pengguna yang mengalami kesulitan dalam dalam menggunakan aplikasi"),
    // Privacy & Security
    ("Privacy & Security", "PSC1",
     "Aplikasi telemedicine menyediakan mekanisme verifikasi dan/atau validasi keabsahan pengguna untuk memastikan bahwa hanya individu yang berwenang yang dapat mengakses data"),
    ("Privacy & Security", "PSC2",
     "Aplikasi telemedicine memiliki fitur keamanan yang baik untuk melindungi data dari akses yang tidak sah dan/atau kebocoran data"),
    // Data Quality & Accessibility
    ("Data Quality & Accessibility", "DQA1",
     "Aplikasi telemedicine menyediakan data yang berkualitas (akurat, mutakhir, dan/atau memiliki tingkat detail yang sesuai) untuk tugas saya memberikan layanan kesehatan jarak jauh kepada pasien"),
    ("Data Quality & Accessibility", "DQA2",
     "Aplikasi telemedicine menyediakan error handling untuk menjaga keakuratan input data"),
    ("Data Quality & Accessibility", "DQA3",
     "Aplikasi telemedicine memungkinkan saya untuk mengakses data yang saya butuhkan dengan mudah"),
    ("Data Quality & Accessibility", "DQA4",
     "Aplikasi telemedicine memungkinkan saya untuk menemukan data tertentu dengan mudah"),
    ("Data Quality & Accessibility", "DQA5",
     "Aplikasi telemedicine menyajikan data dengan makna yang jelas dan/atau mudah untuk diketahui"),
    ("Data Quality & Accessibility", "DQA6",
     "Aplikasi telemedicine menampilkan data yang saya perlukan dalam bentuk yang mudah dibaca dan/atau dimengerti"),
];

/// Dimension name → abbreviation, in dimension order
const DIMENSION_ABBR: &[(&str, &str)] = &[
    ("Data & Services Integration", "DSI"),
    ("Clinical Decision Support", "CDS"),
    ("Clinical Communication", "CCM"),
    ("Clinical Task Support", "CTS"),
    ("Scheduling & Notification", "SCN"),
    ("System Reliability", "SRB"),
    ("Ease of Use & Support", "EUS"),
    ("Privacy & Security", "PSC"),
    ("Data Quality & Accessibility", "DQA"),
];

static ITEM_LIST: Lazy<Vec<Item>> = Lazy::new(|| {
    ITEMS
        .iter()
        .map(|&(dimension, code, prompt)| Item {
            dimension,
            code,
            prompt,
        })
        .collect()
});

static CODE_INDEX: Lazy<HashMap<&'static str, usize>> = Lazy::new(|| {
    ITEM_LIST
        .iter()
        .enumerate()
        .map(|(idx, item)| (item.code, idx))
        .collect()
});

static DIMENSION_LIST: Lazy<Vec<Dimension>> = Lazy::new(|| {
    DIMENSION_ABBR
        .iter()
        .map(|&(name, abbr)| Dimension {
            name,
            abbr,
            codes: ITEM_LIST
                .iter()
                .filter(|item| item.dimension == name)
                .map(|item| item.code)
                .collect(),
        })
        .collect()
});

/// All catalogue items in instrument order
pub fn items() -> &'static [Item] {
    &ITEM_LIST
}

/// Number of catalogue items
pub fn item_count() -> usize {
    ITEM_LIST.len()
}

/// All dimensions in instrument order
pub fn dimensions() -> &'static [Dimension] {
    &DIMENSION_LIST
}

/// Position of an item code in the catalogue, if the code exists
pub fn code_index(code: &str) -> Option<usize> {
    CODE_INDEX.get(code).copied()
}

/// Item for a code, if the code exists
pub fn item(code: &str) -> Option<&'static Item> {
    code_index(code).map(|idx| &ITEM_LIST[idx])
}

/// Dimension for an abbreviation, if it exists
pub fn dimension_by_abbr(abbr: &str) -> Option<&'static Dimension> {
    DIMENSION_LIST.iter().find(|d| d.abbr == abbr)
}

/// Likert label for a performance rating value
pub fn performance_label(value: u8) -> Option<&'static str> {
    if (LIKERT_MIN..=LIKERT_MAX).contains(&value) {
        Some(LIKERT_PERFORMANCE[(value - 1) as usize])
    } else {
        None
    }
}

/// Likert label for an importance rating value
pub fn importance_label(value: u8) -> Option<&'static str> {
    if (LIKERT_MIN..=LIKERT_MAX).contains(&value) {
        Some(LIKERT_IMPORTANCE[(value - 1) as usize])
    } else {
        None
    }
}

// ========================================
// Respondent profile option sets
// ========================================

pub const GENDER_OPTIONS: &[&str] = &["Perempuan", "Laki-laki"];

pub const AGE_OPTIONS: &[&str] = &[
    "<26 tahun",
    "26-30 tahun",
    "31-35 tahun",
    "36-40 tahun",
    "41-45 tahun",
    "46-50 tahun",
    "51-55 tahun",
    "56-60 tahun",
    "61-65 tahun",
    ">65 tahun",
];

pub const SPECIALTY_OPTIONS: &[&str] = &[
    "Dokter umum",
    "Dokter hewan",
    "Dokter gigi",
    "Dokter spesialis anak",
    "Dokter spesialis kulit dan kelamin",
    "Dokter spesialis penyakit dalam",
    "Dokter spesialis paru",
    "Dokter spesialis THT",
    "Dokter spesialis obstetri dan ginekologi",
    "Dokter spesialis kejiwaan",
    "Dokter spesialis mata",
    "Dokter spesialis saraf",
    "Dokter spesialis gizi klinis",
    "Dokter spesialis jantung dan pembulun darah",
    "Dokter spesialis bedah",
    "Dokter spesialis urologi",
    "Dokter spesialis andrologi",
    "Dokter spesialis ortopedi dan traumatologi",
    "Dokter spesialis rehabilitasi medik dan kedokteran fisik",
    "Dokter spesialis anestesiologi",
    "Dokter spesialis radiologi",
    "Dokter spesialis endokrin",
    "Lainnya",
];

/// Specialty option that unlocks the free-text override field
pub const SPECIALTY_OTHER: &str = "Lainnya";

pub const PLATFORM_OPTIONS: &[&str] = &["Alodokter", "Good Doctor", "Halodoc"];

pub const DURATION_OPTIONS: &[&str] = &[
    "<1 tahun",
    "1-2 tahun",
    "3-4 tahun",
    "5-6 tahun",
    "7-8 tahun",
    "9-10 tahun",
    "11-12 tahun",
    "13-14 tahun",
    "15-16 tahun",
    "> 16 tahun",
];

pub const FREQUENCY_OPTIONS: &[&str] = &[
    "Setiap hari",
    "4-6 kali per minggu",
    "1-3 kali per minggu",
    "1-3 kali per bulan",
    "4-11 kali per tahun",
    "1-3 kali per tahun",
    "Kurang dari 1 kali per tahun",
];

pub const LAST_USE_OPTIONS: &[&str] = &[
    "Hari ini",
    "Dalam 1 minggu terakhir",
    "Dalam 1 bulan terakhir",
    "Dalam 3 bulan terakhir",
    "Dalam 6 bulan terakhir",
    "Dalam 1 tahun terakhir",
    "Lebih dari 1 tahun yang lalu",
];
