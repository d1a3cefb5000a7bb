use serde::Deserialize;

/// On-disk layout of the content-similarity artifact
#[derive(Debug, Deserialize)]
struct ContentModelFile {
    titles: Vec<String>,
    similarity: Vec<Vec<f32>>,
}

/// Pairwise content-similarity scores; row and column `i` belong to `titles[i]`
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "ContentModelFile")]
pub struct ContentModel {
    titles: Vec<String>,
    similarity: Vec<Vec<f32>>,
}

impl TryFrom<ContentModelFile> for ContentModel {
    type Error = String;

    fn try_from(file: ContentModelFile) -> Result<Self, Self::Error> {
        Self::new(file.titles, file.similarity)
    }
}

impl ContentModel {
    /// Builds a model, checking the matrix is square and aligned with `titles`
    pub fn new(titles: Vec<String>, similarity: Vec<Vec<f32>>) -> Result<Self, String> {
        if similarity.len() != titles.len() {
            return Err(format!(
                "similarity matrix has {} rows but there are {} titles",
                similarity.len(),
                titles.len()
            ));
        }

        if let Some((row, scores)) = similarity
            .iter()
            .enumerate()
            .find(|(_, scores)| scores.len() != titles.len())
        {
            return Err(format!(
                "similarity row {} has {} columns, expected {}",
                row,
                scores.len(),
                titles.len()
            ));
        }

        Ok(Self { titles, similarity })
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    /// Index of the first row carrying exactly `title`
    pub fn index_of(&self, title: &str) -> Option<usize> {
        self.titles.iter().position(|t| t == title)
    }

    /// Titles most similar to row `index`, best first
    ///
    /// The row itself and any other row with the same title are never returned.
    /// Equal scores keep their row order.
    pub fn most_similar(&self, index: usize, limit: usize) -> Vec<&str> {
        let Some(scores) = self.similarity.get(index) else {
            return Vec::new();
        };
        let own_title = &self.titles[index];

        let mut ranked: Vec<(usize, f32)> = scores
            .iter()
            .copied()
            .enumerate()
            .filter(|(i, _)| *i != index && &self.titles[*i] != own_title)
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

        ranked
            .into_iter()
            .take(limit)
            .map(|(i, _)| self.titles[i].as_str())
            .collect()
    }
}
