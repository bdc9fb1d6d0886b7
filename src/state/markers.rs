#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub time: f64,
    pub label: String,
}

/// Time bookmarks kept sorted by time. Labels are unique.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerStore {
    markers: Vec<Marker>,
}

impl MarkerStore {
    pub fn add(&mut self, label: &str, time: f64) -> Result<&Marker, String> {
        if self.get(label).is_some() {
            return Err(format!("marker '{label}' already exists"));
        }
        let index = self.markers.partition_point(|m| m.time <= time);
        self.markers.insert(
            index,
            Marker {
                time,
                label: label.to_string(),
            },
        );
        Ok(&self.markers[index])
    }

    pub fn remove(&mut self, label: &str) -> bool {
        let before = self.markers.len();
        self.markers.retain(|m| m.label != label);
        self.markers.len() != before
    }

    pub fn get(&self, label: &str) -> Option<&Marker> {
        self.markers.iter().find(|m| m.label == label)
    }

    /// First marker strictly after `time`.
    pub fn next_after(&self, time: f64) -> Option<&Marker> {
        self.markers.iter().find(|m| m.time > time)
    }

    /// Last marker strictly before `time`.
    pub fn prev_before(&self, time: f64) -> Option<&Marker> {
        self.markers.iter().rev().find(|m| m.time < time)
    }

    pub fn labels(&self) -> Vec<String> {
        self.markers.iter().map(|m| m.label.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}
