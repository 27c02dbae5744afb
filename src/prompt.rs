use crate::gather::ConfigFileSelection;
use crate::github::RepositoryMetadata;
use std::fmt::Write;
use std::str::FromStr;

/// Target natural language for the generated README
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    /// English ("en")
    English,
    /// Indonesian ("id")
    Indonesian,
}

impl Language {
    /// Two-letter code used on the wire and in the CLI
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Indonesian => "id",
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" => Ok(Language::English),
            "id" => Ok(Language::Indonesian),
            other => Err(format!("Unsupported language code: {}", other)),
        }
    }
}

/// Everything the composer needs to render one prompt
///
/// A composed, ephemeral value: built once per generation request and
/// discarded afterwards.
#[derive(Debug)]
pub struct PromptRequest {
    /// Repository metadata from the gather stage
    pub metadata: RepositoryMetadata,
    /// Full file tree paths; truncated only at render time
    pub file_paths: Vec<String>,
    /// Gallery image URLs, in user-supplied order
    pub image_urls: Vec<String>,
    /// Lowercased, deduplicated free-text tags
    pub tags: Vec<String>,
    /// Target output language
    pub language: Language,
    /// License identifier, when the user chose one other than "none"
    pub license_id: Option<String>,
    /// The selected config file, if one was detected
    pub config_file: Option<ConfigFileSelection>,
    /// Cap on the number of file entries embedded in the prompt
    pub max_file_entries: usize,
}

/// Lowercases and deduplicates tags, preserving first-seen order
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim().to_lowercase();
        if !tag.is_empty() && !seen.contains(&tag) {
            seen.push(tag);
        }
    }
    seen
}

/// Display name for a license identifier, e.g. `apache-2.0` -> `APACHE 2.0`
fn license_display_name(id: &str) -> String {
    id.to_uppercase().replace('-', " ")
}

/// Fence language marker derived from a config file's extension
fn fence_language(file_name: &str) -> &str {
    match file_name.rsplit_once('.').map(|(_, ext)| ext) {
        Some("json") => "json",
        Some("xml") => "xml",
        Some("gradle") => "gradle",
        Some("txt") => "text",
        Some(ext) => ext,
        // Dockerfile and other extensionless manifests
        None => "dockerfile",
    }
}

/// Renders the complete natural-language instruction string for the
/// generative API
///
/// Pure and deterministic: the same request always yields the same prompt.
/// Section numbers are assigned incrementally, so numbering stays contiguous
/// regardless of which optional sections (gallery, license) are present.
pub fn compose(req: &PromptRequest) -> String {
    let indonesian = req.language == Language::Indonesian;
    let mut prompt = String::new();

    // Intro and the out-of-band license handling instruction
    prompt.push_str(intro_text(indonesian));
    prompt.push('\n');

    if let Some(id) = &req.license_id {
        let name = license_display_name(id);
        if indonesian {
            let _ = writeln!(
                prompt,
                "\n**Instruksi Lisensi**: Proyek ini menggunakan Lisensi {}. Buat bagian 'License' di akhir README yang menyatakan hal ini dan arahkan pembaca untuk melihat file 'LICENSE' untuk detail lengkap.",
                name
            );
        } else {
            let _ = writeln!(
                prompt,
                "\n**License Instruction**: This project uses the {} License. Create a 'License' section at the end of the README stating this, and direct readers to see the 'LICENSE' file for full details.",
                name
            );
        }
    }

    // Repository data block
    let meta = &req.metadata;
    prompt.push_str("\nRepository Data:\n");
    let _ = writeln!(prompt, "- Name: {}", meta.name);
    let _ = writeln!(
        prompt,
        "- Description: {}",
        meta.description.as_deref().unwrap_or("No description.")
    );
    let _ = writeln!(
        prompt,
        "- Main Language: {}",
        meta.language.as_deref().unwrap_or("Not specified")
    );
    let _ = writeln!(prompt, "- Link: {}", meta.html_url);
    let _ = writeln!(
        prompt,
        "- License: {}",
        req.license_id.as_deref().unwrap_or("none")
    );
    let shown: Vec<&str> = req
        .file_paths
        .iter()
        .take(req.max_file_entries)
        .map(String::as_str)
        .collect();
    let _ = writeln!(prompt, "- Files: {}", shown.join(", "));

    if !req.tags.is_empty() {
        if indonesian {
            let _ = writeln!(
                prompt,
                "\n**Konteks Tambahan dari Pengguna (gunakan sebagai referensi kuat):**\n- Tags: {}",
                req.tags.join(", ")
            );
        } else {
            let _ = writeln!(
                prompt,
                "\n**Additional Context from User (use as a strong reference):**\n- Tags: {}",
                req.tags.join(", ")
            );
        }
    }

    if let Some(config) = &req.config_file {
        let lang = fence_language(&config.file_name);
        if indonesian {
            let _ = writeln!(
                prompt,
                "\n**File Konfigurasi Terdeteksi ({})**: Gunakan isi file ini sebagai sumber otoritatif untuk perintah instalasi dan menjalankan proyek:\n```{}\n{}\n```",
                config.file_name, lang, config.content
            );
        } else {
            let _ = writeln!(
                prompt,
                "\n**Detected Config File ({})**: Treat this file's content as the authoritative source for install and run commands:\n```{}\n{}\n```",
                config.file_name, lang, config.content
            );
        }
    }

    // Numbered structure instructions; the counter only advances for
    // sections actually emitted
    if indonesian {
        prompt.push_str("\nStruktur README dan Instruksi (Ikuti dengan SANGAT KETAT dan DETAIL):\n");
    } else {
        prompt.push_str("\nREADME Structure and Instructions (Follow VERY STRICTLY and be DETAILED):\n");
    }

    let mut section = 0u32;
    let mut next = || {
        section += 1;
        section
    };

    for line in [
        title_section(indonesian, next()),
        badges_section(indonesian, next()),
        description_section(indonesian, next()),
    ] {
        prompt.push_str(&line);
        prompt.push('\n');
    }

    if !req.image_urls.is_empty() {
        prompt.push_str(&gallery_section(indonesian, next(), &req.image_urls));
        prompt.push('\n');
    }

    for line in [
        features_section(indonesian, next()),
        tech_section(indonesian, next()),
        install_section(indonesian, next()),
        contribute_section(indonesian, next()),
    ] {
        prompt.push_str(&line);
        prompt.push('\n');
    }

    if let Some(id) = &req.license_id {
        prompt.push_str(&license_section(indonesian, next(), &license_display_name(id)));
        prompt.push('\n');
    }

    prompt.push_str(outro_text(indonesian));
    prompt.push('\n');
    prompt
}

fn intro_text(indonesian: bool) -> &'static str {
    if indonesian {
        "Sebagai seorang Principal Software Engineer dan penulis teknis, buatkan file README.md yang sangat detail, profesional, dan komprehensif untuk repositori GitHub berikut. Gunakan emoji yang relevan untuk setiap bagian."
    } else {
        "As a Principal Software Engineer and technical writer, create a highly detailed, professional, and comprehensive README.md file for the following GitHub repository. Use relevant emojis for each section."
    }
}

fn title_section(indonesian: bool, n: u32) -> String {
    if indonesian {
        format!("{}. **Judul Proyek**: Gunakan nama proyek sebagai H1.", n)
    } else {
        format!("{}. **Project Title**: Use the project name as H1.", n)
    }
}

fn badges_section(indonesian: bool, n: u32) -> String {
    if indonesian {
        format!("{}. **Badges**: Sertakan badge dari Shields.io untuk bahasa utama, lisensi (jika ada), dan teknologi relevan lainnya yang bisa kamu deteksi.", n)
    } else {
        format!("{}. **Badges**: Include badges from Shields.io for the main language, the license (if specified), and other relevant technologies you can detect.", n)
    }
}

fn description_section(indonesian: bool, n: u32) -> String {
    if indonesian {
        format!("{}. **Deskripsi Proyek 📝**: Tulis deskripsi yang menarik dan detail (3-4 paragraf). Jelaskan apa tujuan proyek ini, masalah apa yang dipecahkannya, dan untuk siapa proyek ini dibuat.", n)
    } else {
        format!("{}. **Project Description 📝**: Write a compelling and detailed description (3-4 paragraphs). Explain what this project does, what problem it solves, and who it is for.", n)
    }
}

fn gallery_section(indonesian: bool, n: u32, image_urls: &[String]) -> String {
    let mut gallery = format!(
        "<p align=\"center\"><img src=\"{}\" alt=\"Project Preview\" width=\"80%\"></p>",
        image_urls[0]
    );
    for url in &image_urls[1..] {
        let _ = write!(gallery, "\n{}", url);
    }

    if indonesian {
        format!("{}. **Galeri Proyek 🖼️**: Tampilkan galeri ini:\n{}", n, gallery)
    } else {
        format!("{}. **Project Gallery 🖼️**: Display this gallery:\n{}", n, gallery)
    }
}

fn features_section(indonesian: bool, n: u32) -> String {
    if indonesian {
        format!("{}. **Fitur Utama ✨**: Buat daftar fitur-fitur utama. Untuk setiap fitur, berikan deskripsi singkat namun berdampak yang menjelaskan apa yang dilakukannya dan manfaatnya.", n)
    } else {
        format!("{}. **Key Features ✨**: List the main features. For each feature, provide a brief but impactful description explaining what it does and its benefit.", n)
    }
}

fn tech_section(indonesian: bool, n: u32) -> String {
    if indonesian {
        format!("{}. **Tech Stack & Tools 🛠️**: Buat daftar teknologi, framework, dan tools yang digunakan. Jika memungkinkan, gunakan format tabel atau daftar yang rapi. Simpulkan dari daftar file (misalnya 'package.json', 'pom.xml', dll.) dan konteks yang diberikan.", n)
    } else {
        format!("{}. **Tech Stack & Tools 🛠️**: List the technologies, frameworks, and tools used. If possible, use a table or a well-formatted list. Infer from the file list (e.g., 'package.json', 'pom.xml', etc.) and the provided context.", n)
    }
}

fn install_section(indonesian: bool, n: u32) -> String {
    if indonesian {
        format!("{}. **Instalasi & Menjalankan Secara Lokal 🚀**: Berikan panduan langkah-demi-langkah yang jelas. Mulai dari prasyarat (misal: versi Node.js, Python, dll.), lalu kloning, instalasi dependensi, dan cara menjalankan proyek. Setiap perintah terminal dan nama file HARUS dibungkus dalam blok kode (```bash ... ```) atau penanda kode inline.", n)
    } else {
        format!("{}. **Installation & Running Locally 🚀**: Provide a clear, step-by-step guide. Start with prerequisites (e.g., Node.js version, Python, etc.), then cloning, installing dependencies, and how to run the project. Every terminal command and filename MUST be wrapped in its own code block (```bash ... ```) or inline code marker.", n)
    }
}

fn contribute_section(indonesian: bool, n: u32) -> String {
    if indonesian {
        format!("{}. **Cara Berkontribusi 🤝**: Jelaskan secara singkat bagaimana orang lain dapat berkontribusi pada proyek ini.", n)
    } else {
        format!("{}. **How to Contribute 🤝**: Briefly explain how others can contribute to this project.", n)
    }
}

fn license_section(indonesian: bool, n: u32, name: &str) -> String {
    if indonesian {
        format!("{}. **Lisensi 📄**: Sebutkan bahwa proyek ini di bawah Lisensi {} dan rujuk ke file LICENSE.", n, name)
    } else {
        format!("{}. **License 📄**: Mention the project is under the {} License and refer to the LICENSE file.", n, name)
    }
}

fn outro_text(indonesian: bool) -> &'static str {
    if indonesian {
        "Pastikan hasil AKHIR HANYA berupa konten Markdown mentah yang lengkap dan terstruktur dengan baik, tanpa penjelasan pembuka atau penutup."
    } else {
        "Ensure the FINAL output is ONLY the raw, complete, and well-structured Markdown content, without any introductory or concluding remarks."
    }
}
