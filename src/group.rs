use crate::color::Color;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Represents a single file shown under a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Name shown in the tree; a part name for split files.
    pub display_name: String,
    /// File read when the entry is selected.
    pub path: PathBuf,
}

impl FileEntry {
    pub fn new(display_name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            display_name: display_name.into(),
            path: path.into(),
        }
    }

    pub fn get_path(&self) -> &Path {
        &self.path
    }
}

/// A named, colored collection of files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    name: String,
    color: Color,
    files: Vec<FileEntry>,
}

impl Group {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Color fixed at creation time.
    pub fn color(&self) -> Color {
        self.color
    }

    pub fn files(&self) -> &[FileEntry] {
        &self.files
    }
}

/// Change notifications for a tree view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupEvent {
    GroupCreated { group: String, color: Color },
    FileAdded { group: String, file: FileEntry },
    FileRemoved { group: String, file: FileEntry },
    GroupRemoved { group: String },
}

/// What `remove_file` ended up removing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Removal {
    /// The file went away and its group still has other files.
    File(FileEntry),
    /// The file was the last one, so its group went away too.
    FileAndGroup(FileEntry),
}

type GroupListener = Box<dyn FnMut(&GroupEvent)>;

/// Manages the groups of opened files, in insertion order.
#[derive(Default)]
pub struct GroupRegistry {
    groups: Vec<Group>,
    listeners: Vec<GroupListener>,
}

impl std::fmt::Debug for GroupRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupRegistry")
            .field("groups", &self.groups)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callback invoked after every change.
    pub fn subscribe(&mut self, listener: impl FnMut(&GroupEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Appends a file to `group_name`, creating the group with `color` if it
    /// does not exist yet. An existing group keeps its original color.
    ///
    /// No de-duplication is performed.
    pub fn add_to_group(
        &mut self,
        group_name: &str,
        display_name: &str,
        path: impl Into<PathBuf>,
        color: Color,
    ) {
        let index = match self.position(group_name) {
            Some(index) => index,
            None => {
                self.groups.push(Group {
                    name: group_name.to_string(),
                    color,
                    files: Vec::new(),
                });
                info!("Created group '{group_name}' with color {color}");
                self.notify(GroupEvent::GroupCreated {
                    group: group_name.to_string(),
                    color,
                });
                self.groups.len() - 1
            }
        };

        let entry = FileEntry::new(display_name, path);
        debug!("Adding {:?} to group '{group_name}'", entry.path);
        self.groups[index].files.push(entry.clone());
        self.notify(GroupEvent::FileAdded {
            group: group_name.to_string(),
            file: entry,
        });
    }

    /// Removes the first file named `display_name` from `group_name`.
    ///
    /// Removing the last file removes the group as well. Returns `None` when
    /// nothing matched.
    pub fn remove_file(&mut self, group_name: &str, display_name: &str) -> Option<Removal> {
        let file_index = self
            .list_files(group_name)
            .iter()
            .position(|f| f.display_name == display_name)?;
        self.remove_file_at(group_name, file_index)
    }

    /// Removes the file at `file_index` of `group_name`. Display names may
    /// repeat within a group, positions do not.
    pub fn remove_file_at(&mut self, group_name: &str, file_index: usize) -> Option<Removal> {
        let group_index = self.position(group_name)?;
        let group = &mut self.groups[group_index];
        if file_index >= group.files.len() {
            return None;
        }
        let entry = group.files.remove(file_index);
        let now_empty = group.files.is_empty();

        self.notify(GroupEvent::FileRemoved {
            group: group_name.to_string(),
            file: entry.clone(),
        });

        if now_empty {
            self.groups.remove(group_index);
            info!("Group '{group_name}' is empty and was removed");
            self.notify(GroupEvent::GroupRemoved {
                group: group_name.to_string(),
            });
            Some(Removal::FileAndGroup(entry))
        } else {
            Some(Removal::File(entry))
        }
    }

    /// Removes a group and all of its files. Returns the removed group.
    pub fn remove_group(&mut self, group_name: &str) -> Option<Group> {
        let index = self.position(group_name)?;
        let group = self.groups.remove(index);
        info!(
            "Closed group '{group_name}' with {} file(s)",
            group.files.len()
        );
        self.notify(GroupEvent::GroupRemoved {
            group: group_name.to_string(),
        });
        Some(group)
    }

    pub fn list_groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group(&self, group_name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name == group_name)
    }

    /// Files of a group in insertion order; empty for unknown groups.
    pub fn list_files(&self, group_name: &str) -> &[FileEntry] {
        self.group(group_name).map(Group::files).unwrap_or(&[])
    }

    /// Resolves a tree click on a file to the path to open.
    pub fn file_path(&self, group_name: &str, display_name: &str) -> Option<&Path> {
        self.list_files(group_name)
            .iter()
            .find(|f| f.display_name == display_name)
            .map(FileEntry::get_path)
    }

    /// Color of an existing group.
    pub fn color_of(&self, group_name: &str) -> Option<Color> {
        self.group(group_name).map(Group::color)
    }

    /// Group names, used for completion when choosing a target group.
    pub fn group_names(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    fn position(&self, group_name: &str) -> Option<usize> {
        self.groups.iter().position(|g| g.name == group_name)
    }

    fn notify(&mut self, event: GroupEvent) {
        for listener in &mut self.listeners {
            listener(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn entry(name: &str, path: &str) -> FileEntry {
        FileEntry::new(name, path)
    }

    #[test]
    fn test_add_to_new_group_creates_single_group() {
        let mut registry = GroupRegistry::new();
        registry.add_to_group("errors", "a.log", "/tmp/a.log", Color::WHITE);

        assert_eq!(registry.list_groups().len(), 1);
        assert_eq!(
            registry.list_files("errors"),
            &[entry("a.log", "/tmp/a.log")]
        );
    }

    #[test]
    fn test_files_keep_insertion_order_and_group_lifecycle() {
        let mut registry = GroupRegistry::new();
        registry.add_to_group("errors", "a.log", "/tmp/a.log", Color::WHITE);
        registry.add_to_group("errors", "b.log", "/tmp/b.log", Color::WHITE);
        assert_eq!(
            registry.list_files("errors"),
            &[entry("a.log", "/tmp/a.log"), entry("b.log", "/tmp/b.log")]
        );

        let removal = registry.remove_file("errors", "a.log");
        assert_eq!(removal, Some(Removal::File(entry("a.log", "/tmp/a.log"))));
        assert_eq!(
            registry.list_files("errors"),
            &[entry("b.log", "/tmp/b.log")]
        );

        let removal = registry.remove_file("errors", "b.log");
        assert_eq!(
            removal,
            Some(Removal::FileAndGroup(entry("b.log", "/tmp/b.log")))
        );
        assert!(registry.group("errors").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_existing_group_keeps_its_color() {
        let mut registry = GroupRegistry::new();
        registry.add_to_group("net", "a.log", "/tmp/a.log", Color::YELLOW);
        registry.add_to_group("net", "b.log", "/tmp/b.log", Color::BLACK);
        assert_eq!(registry.color_of("net"), Some(Color::YELLOW));
    }

    #[test]
    fn test_duplicate_display_names_are_kept() {
        let mut registry = GroupRegistry::new();
        registry.add_to_group("g", "a.log", "/tmp/1/a.log", Color::WHITE);
        registry.add_to_group("g", "a.log", "/tmp/2/a.log", Color::WHITE);
        assert_eq!(registry.list_files("g").len(), 2);

        registry.remove_file("g", "a.log");
        assert_eq!(
            registry.list_files("g"),
            &[entry("a.log", "/tmp/2/a.log")]
        );
    }

    #[test]
    fn test_remove_file_at_picks_exact_duplicate() {
        let mut registry = GroupRegistry::new();
        registry.add_to_group("g", "a.log", "/tmp/1/a.log", Color::WHITE);
        registry.add_to_group("g", "a.log", "/tmp/2/a.log", Color::WHITE);

        assert_eq!(
            registry.remove_file_at("g", 1),
            Some(Removal::File(entry("a.log", "/tmp/2/a.log")))
        );
        assert_eq!(registry.remove_file_at("g", 1), None);
        assert_eq!(
            registry.remove_file_at("g", 0),
            Some(Removal::FileAndGroup(entry("a.log", "/tmp/1/a.log")))
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_remove_group_drops_all_files() {
        let mut registry = GroupRegistry::new();
        registry.add_to_group("a", "1.log", "/tmp/1.log", Color::WHITE);
        registry.add_to_group("b", "2.log", "/tmp/2.log", Color::WHITE);
        registry.add_to_group("a", "3.log", "/tmp/3.log", Color::WHITE);

        let removed = registry.remove_group("a").unwrap();
        assert_eq!(removed.files().len(), 2);
        assert_eq!(registry.group_names(), ["b"]);
        assert!(registry.list_files("a").is_empty());
    }

    #[test]
    fn test_remove_unknown_returns_none() {
        let mut registry = GroupRegistry::new();
        registry.add_to_group("a", "1.log", "/tmp/1.log", Color::WHITE);
        assert_eq!(registry.remove_file("a", "zzz.log"), None);
        assert_eq!(registry.remove_file("zzz", "1.log"), None);
        assert!(registry.remove_group("zzz").is_none());
    }

    #[test]
    fn test_file_path_lookup() {
        let mut registry = GroupRegistry::new();
        registry.add_to_group("a", "1.log", "/tmp/1.log", Color::WHITE);
        assert_eq!(
            registry.file_path("a", "1.log"),
            Some(Path::new("/tmp/1.log"))
        );
        assert_eq!(registry.file_path("a", "2.log"), None);
    }

    #[test]
    fn test_listeners_receive_events_in_order() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);

        let mut registry = GroupRegistry::new();
        registry.subscribe(move |event| sink.borrow_mut().push(event.clone()));
        registry.add_to_group("g", "a.log", "/tmp/a.log", Color::YELLOW);
        registry.remove_file("g", "a.log");

        let events = events.borrow();
        assert_eq!(
            *events,
            vec![
                GroupEvent::GroupCreated {
                    group: "g".to_string(),
                    color: Color::YELLOW
                },
                GroupEvent::FileAdded {
                    group: "g".to_string(),
                    file: entry("a.log", "/tmp/a.log")
                },
                GroupEvent::FileRemoved {
                    group: "g".to_string(),
                    file: entry("a.log", "/tmp/a.log")
                },
                GroupEvent::GroupRemoved {
                    group: "g".to_string()
                },
            ]
        );
    }
}
