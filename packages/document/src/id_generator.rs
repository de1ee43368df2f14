use crc32fast::Hasher;

/// Seed for a namespace using CRC32
pub fn get_namespace_seed(namespace: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(namespace.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential id generator for nodes: `<type>-<seed>-<n>`
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String, // Namespace CRC32
    count: u32,
}

impl IdGenerator {
    pub fn new(namespace: &str) -> Self {
        Self {
            seed: get_namespace_seed(namespace),
            count: 0,
        }
    }

    pub fn from_seed(seed: String) -> Self {
        Self { seed, count: 0 }
    }

    /// Generate next sequential id for a component type
    pub fn new_id(&mut self, component_type: &str) -> String {
        self.count += 1;
        format!("{}-{}-{}", component_type, self.seed, self.count)
    }

    /// Generate the next id that `taken` does not already claim
    pub fn fresh_id(&mut self, component_type: &str, taken: impl Fn(&str) -> bool) -> String {
        loop {
            let id = self.new_id(component_type);
            if !taken(&id) {
                return id;
            }
        }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}
