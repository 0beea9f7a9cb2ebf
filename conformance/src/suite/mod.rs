//! The behavioural contract a Todo/Tag backend has to satisfy.
//!
//! # Overview
//! [`catalogue`] returns every scenario in the order it should run. A
//! scenario is a plain function over a [`BackendClient`] that issues its
//! requests one after another and fails on the first error or unmet
//! expectation. Scenarios that depend on collection contents declare a
//! [`Setup`] that clears the relevant collections first, so each one assumes
//! it owns the backend while it runs.

mod associations;
mod collection;
mod cors;
pub mod expect;
mod todos;

use crate::client::BackendClient;
use crate::error::ConformanceError;
use crate::types::{NewTag, NewTodo, Resource, Tag, TagPatch, Todo, TodoPatch};

pub type ScenarioFn = fn(&BackendClient) -> Result<(), ConformanceError>;

/// Collections a scenario clears before it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setup {
    None,
    ClearTodos,
    ClearTags,
    ClearBoth,
}

impl Setup {
    pub fn apply(self, client: &BackendClient) -> Result<(), ConformanceError> {
        match self {
            Setup::None => Ok(()),
            Setup::ClearTodos => client.todos().delete_all(),
            Setup::ClearTags => client.tags().delete_all(),
            Setup::ClearBoth => {
                client.todos().delete_all()?;
                client.tags().delete_all()
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Scenario {
    pub group: &'static str,
    pub title: &'static str,
    pub setup: Setup,
    pub run: ScenarioFn,
}

impl Scenario {
    pub fn new(group: &'static str, title: &'static str, setup: Setup, run: ScenarioFn) -> Self {
        Self {
            group,
            title,
            setup,
            run,
        }
    }

    /// Applies the setup, then runs the scenario body.
    pub fn execute(&self, client: &BackendClient) -> Result<(), ConformanceError> {
        self.setup.apply(client)?;
        (self.run)(client)
    }
}

/// Group and scenario titles for the scenarios shared by both collections.
pub(crate) struct Groups {
    pub basics: &'static str,
    pub storing: &'static str,
    pub existing: &'static str,
    pub titles: Titles,
}

/// Scenario titles, worded for one resource type.
pub(crate) struct Titles {
    pub responds_to_get: &'static str,
    pub responds_to_post: &'static str,
    pub responds_to_delete: &'static str,
    pub empty_after_delete: &'static str,
    pub adds_to_list: &'static str,
    pub has_an_id: &'static str,
    pub id_retrieves: &'static str,
    pub has_a_url: &'static str,
    pub url_returns: &'static str,
    pub navigate_via_urls: &'static str,
    pub patch_title: &'static str,
    pub title_change_persisted: &'static str,
    pub delete_via_url: &'static str,
    pub delete_keeps_siblings: &'static str,
}

/// Resource types the shared collection scenarios can exercise.
pub(crate) trait Sample: Resource + std::fmt::Debug {
    /// Setup that empties this resource's collection.
    const CLEAR: Setup;

    fn titled(title: &str) -> Self::Create;
    fn retitled(title: &str) -> Self::Update;
}

impl Sample for Todo {
    const CLEAR: Setup = Setup::ClearTodos;

    fn titled(title: &str) -> NewTodo {
        NewTodo::titled(title)
    }

    fn retitled(title: &str) -> TodoPatch {
        TodoPatch {
            title: Some(title.to_string()),
            ..TodoPatch::default()
        }
    }
}

impl Sample for Tag {
    const CLEAR: Setup = Setup::ClearTags;

    fn titled(title: &str) -> NewTag {
        NewTag::titled(title)
    }

    fn retitled(title: &str) -> TagPatch {
        TagPatch {
            title: Some(title.to_string()),
        }
    }
}

const TODO_GROUPS: Groups = Groups {
    basics: "todo basics",
    storing: "storing new todos by posting to the root url",
    existing: "working with an existing todo",
    titles: Titles {
        responds_to_get: "the todo endpoint responds to a GET on the todos",
        responds_to_post: "the todo endpoint responds to a POST with the posted todo",
        responds_to_delete: "the todos endpoint responds successfully to a DELETE",
        empty_after_delete: "after a DELETE the todo root responds to a GET with an empty array",
        adds_to_list: "adds a new todo to the list of todos at the root url",
        has_an_id: "each todo has an ID",
        id_retrieves: "each todo has an ID, which can be used to retrieve the todo",
        has_a_url: "each new todo has a url",
        url_returns: "each new todo has a url, which returns a todo",
        navigate_via_urls: "can navigate from a list of todos to an individual todo via urls",
        patch_title: "can change the todo's title by PATCHing to the todo's url",
        title_change_persisted: "title changes to a todo persist and show up when re-fetching",
        delete_via_url: "can delete a todo making a DELETE request to the todo's url",
        delete_keeps_siblings: "deleting one todo leaves the other todos in place",
    },
};

const TAG_GROUPS: Groups = Groups {
    basics: "tag basics",
    storing: "storing new tags by posting to the root url",
    existing: "working with an existing tag",
    titles: Titles {
        responds_to_get: "the tag endpoint responds to a GET on the tags",
        responds_to_post: "the tag endpoint responds to a POST with the tag which was posted to it",
        responds_to_delete: "the tags endpoint responds successfully to a DELETE",
        empty_after_delete: "after a DELETE the tag root responds to a GET with an empty array",
        adds_to_list: "adds a new tag to the list of tags at the root url",
        has_an_id: "each tag has an ID",
        id_retrieves: "each tag has an ID, which can be used to retrieve the tag",
        has_a_url: "each new tag has a url",
        url_returns: "each new tag has a url, which returns a tag",
        navigate_via_urls: "can navigate from a list of tags to an individual tag via urls",
        patch_title: "can change the tag's title by PATCHing to the tag's url",
        title_change_persisted: "changes to a tag are persisted and show up when re-fetching it",
        delete_via_url: "can delete a tag making a DELETE request to the tag's url",
        delete_keeps_siblings: "deleting one tag leaves the other tags in place",
    },
};

/// Every scenario, in run order.
pub fn catalogue() -> Vec<Scenario> {
    let mut scenarios = Vec::new();

    scenarios.extend(collection::basics::<Todo>(&TODO_GROUPS));
    scenarios.extend(collection::storing::<Todo>(&TODO_GROUPS));
    scenarios.extend(todos::storing(TODO_GROUPS.storing));
    scenarios.extend(collection::existing::<Todo>(&TODO_GROUPS));
    scenarios.extend(todos::existing(TODO_GROUPS.existing));
    scenarios.extend(todos::ordering());

    scenarios.extend(collection::basics::<Tag>(&TAG_GROUPS));
    scenarios.extend(collection::storing::<Tag>(&TAG_GROUPS));
    scenarios.extend(collection::existing::<Tag>(&TAG_GROUPS));

    scenarios.extend(associations::todos_tags());
    scenarios.extend(associations::tags_todos());

    scenarios.extend(cors::scenarios());

    scenarios
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn catalogue_groups_run_in_contract_order() {
        let mut groups: Vec<&str> = Vec::new();
        for scenario in catalogue() {
            if groups.last() != Some(&scenario.group) {
                groups.push(scenario.group);
            }
        }
        assert_eq!(
            groups,
            [
                "todo basics",
                "storing new todos by posting to the root url",
                "working with an existing todo",
                "tracking todo order",
                "tag basics",
                "storing new tags by posting to the root url",
                "working with an existing tag",
                "todos' tags",
                "tags' todos",
                "cross-origin support",
            ]
        );
    }

    #[test]
    fn scenario_titles_are_unique_within_a_group() {
        let scenarios = catalogue();
        let keys: HashSet<_> = scenarios.iter().map(|s| (s.group, s.title)).collect();
        assert_eq!(keys.len(), scenarios.len());
    }

    #[test]
    fn shared_scenarios_name_their_resource() {
        let titles: Vec<&str> = catalogue().iter().map(|s| s.title).collect();
        assert!(titles.contains(&"each todo has an ID"));
        assert!(titles.contains(&"each tag has an ID"));
        assert!(!titles.iter().any(|t| t.contains("resource")));
    }

    #[test]
    fn association_scenarios_clear_both_collections() {
        for scenario in catalogue() {
            if scenario.group.contains("' t") {
                assert_eq!(scenario.setup, Setup::ClearBoth, "{}", scenario.title);
            }
        }
    }

    #[test]
    fn basics_need_no_setup() {
        for scenario in catalogue() {
            if scenario.group.ends_with("basics") {
                assert_eq!(scenario.setup, Setup::None, "{}", scenario.title);
            }
        }
    }
}
