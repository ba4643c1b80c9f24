use rustc_hash::FxHashSet;
use slug::slugify;

/// Produces slugs that are unique within one document, e.g. for heading ids.
pub struct Slugger {
    generated_slugs: FxHashSet<String>,
}

impl Slugger {
    pub fn new() -> Self {
        Self {
            generated_slugs: FxHashSet::default(),
        }
    }

    pub fn slugify(&mut self, text: &str) -> String {
        let base = slugify(text);
        let mut slug = base.clone();
        let mut counter = 1;
        while self.generated_slugs.contains(&slug) {
            slug = format!("{}-{}", base, counter);
            counter += 1;
        }
        self.generated_slugs.insert(slug.clone());
        slug
    }
}
