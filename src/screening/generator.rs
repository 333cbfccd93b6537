//! Synthetic one-page PDF resumes with known relevance labels

use crate::error::{Result, ScreenerError};
use crate::screening::evaluation::{save_ground_truth, GroundTruth};
use log::info;
use printpdf::{BuiltinFont, Mm, PdfDocument};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

const FIRST_NAMES: [&str; 26] = [
    "Alice", "Bob", "Cathy", "David", "Emma", "Frank", "Grace", "Harry", "Isabel", "John", "Kelly",
    "Leo", "Mona", "Nathan", "Olivia", "Paul", "Queen", "Ryan", "Sophia", "Tom", "Uma", "Victor",
    "Wendy", "Xander", "Yara", "Zane",
];

const LAST_NAMES: [&str; 26] = [
    "Johnson", "Smith", "Zhang", "Lee", "Davis", "Thomas", "Wong", "Wilson", "Moore", "Doe",
    "Taylor", "Brown", "Anderson", "White", "Martin", "Clark", "Lewis", "Walker", "Hall", "Allen",
    "Young", "King", "Wright", "Scott", "Green", "Baker",
];

pub const RELEVANT_SKILLS: [&str; 10] = [
    "Python",
    "SQL",
    "Machine Learning",
    "Deep Learning",
    "NLP",
    "Data Engineering",
    "Spark",
    "TensorFlow",
    "PyTorch",
    "AWS",
];

pub const IRRELEVANT_SKILLS: [&str; 10] = [
    "Manual Testing",
    "JIRA",
    "Tech Support",
    "Customer Service",
    "Frontend Dev",
    "UI/UX",
    "Networking",
    "Firewalls",
    "MS Excel",
    "Data Entry",
];

const SKILLS_PER_RESUME: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticResume {
    pub file: String,
    pub name: String,
    pub skills: Vec<&'static str>,
    pub relevant: bool,
}

impl SyntheticResume {
    /// Resume number `index` (1-based). Even numbers draw from the relevant pool.
    pub fn nth(index: usize) -> Self {
        let relevant = index % 2 == 0;
        let pool = if relevant { &RELEVANT_SKILLS } else { &IRRELEVANT_SKILLS };
        let offset = (index / 2) * 3;
        let skills = (0..SKILLS_PER_RESUME)
            .map(|k| pool[(offset + k) % pool.len()])
            .collect();

        Self {
            file: format!("resume_{}.pdf", index),
            name: format!(
                "{} {}",
                FIRST_NAMES[(index * 5) % FIRST_NAMES.len()],
                LAST_NAMES[(index * 11) % LAST_NAMES.len()]
            ),
            skills,
            relevant,
        }
    }

    pub fn lines(&self) -> [String; 2] {
        [
            format!("Name: {}", self.name),
            format!("Skills: {}", self.skills.join(", ")),
        ]
    }

    pub fn write_pdf(&self, path: &Path) -> Result<()> {
        let (doc, page, layer) = PdfDocument::new(self.file.as_str(), Mm(210.0), Mm(297.0), "Layer 1");
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ScreenerError::Processing(format!("Failed to load PDF font: {}", e)))?;

        let current_layer = doc.get_page(page).get_layer(layer);
        for (row, line) in self.lines().iter().enumerate() {
            let y = 280.0 - row as f32 * 10.0;
            current_layer.use_text(line.as_str(), 12.0, Mm(10.0), Mm(y), &font);
        }

        let mut writer = BufWriter::new(File::create(path)?);
        doc.save(&mut writer)
            .map_err(|e| ScreenerError::Processing(format!("Failed to write {}: {}", path.display(), e)))
    }
}

/// Write `count` resumes into `dir` and return their labels, saving them to `labels_path` if given.
pub fn generate_resumes(dir: &Path, count: usize, labels_path: Option<&Path>) -> Result<GroundTruth> {
    std::fs::create_dir_all(dir)?;

    let mut labels = GroundTruth::new();
    for index in 1..=count {
        let resume = SyntheticResume::nth(index);
        resume.write_pdf(&dir.join(&resume.file))?;
        labels.insert(resume.file, u8::from(resume.relevant));
    }
    info!("{} synthetic resumes generated in {}", count, dir.display());

    if let Some(path) = labels_path {
        save_ground_truth(&labels, path)?;
    }
    Ok(labels)
}
