//! Scenarios every collection has to pass, written once for todos and tags.

use super::expect::{ensure_eq, ensure_id, ensure_len, ensure_url, first};
use super::{Groups, Sample, Scenario, Setup};
use crate::client::BackendClient;
use crate::error::ConformanceError;

type Outcome = Result<(), ConformanceError>;

pub(super) fn basics<R: Sample>(groups: &Groups) -> Vec<Scenario> {
    let (group, t) = (groups.basics, &groups.titles);
    vec![
        Scenario::new(group, t.responds_to_get, Setup::None, responds_to_get::<R>),
        Scenario::new(group, t.responds_to_post, Setup::None, responds_to_post::<R>),
        Scenario::new(group, t.responds_to_delete, Setup::None, responds_to_delete::<R>),
        Scenario::new(group, t.empty_after_delete, Setup::None, empty_after_delete::<R>),
    ]
}

pub(super) fn storing<R: Sample>(groups: &Groups) -> Vec<Scenario> {
    let (group, t) = (groups.storing, &groups.titles);
    vec![
        Scenario::new(group, t.adds_to_list, R::CLEAR, adds_to_list::<R>),
        Scenario::new(group, t.has_an_id, R::CLEAR, has_an_id::<R>),
        Scenario::new(group, t.id_retrieves, R::CLEAR, id_retrieves::<R>),
        Scenario::new(group, t.has_a_url, R::CLEAR, has_a_url::<R>),
        Scenario::new(group, t.url_returns, R::CLEAR, url_returns::<R>),
    ]
}

pub(super) fn existing<R: Sample>(groups: &Groups) -> Vec<Scenario> {
    let (group, t) = (groups.existing, &groups.titles);
    vec![
        Scenario::new(group, t.navigate_via_urls, R::CLEAR, navigate_via_urls::<R>),
        Scenario::new(group, t.patch_title, R::CLEAR, patch_title::<R>),
        Scenario::new(group, t.title_change_persisted, R::CLEAR, title_change_persisted::<R>),
        Scenario::new(group, t.delete_via_url, R::CLEAR, delete_via_url::<R>),
        Scenario::new(group, t.delete_keeps_siblings, R::CLEAR, delete_keeps_siblings::<R>),
    ]
}

fn create<R: Sample>(client: &BackendClient, title: &str) -> Result<R, ConformanceError> {
    client.collection::<R>().create(&R::titled(title))
}

fn responds_to_get<R: Sample>(client: &BackendClient) -> Outcome {
    client.raw_get(client.collection::<R>().root())?;
    Ok(())
}

fn responds_to_post<R: Sample>(client: &BackendClient) -> Outcome {
    let created = create::<R>(client, "a new one")?;
    ensure_eq("the posted title", "a new one", created.title())
}

fn responds_to_delete<R: Sample>(client: &BackendClient) -> Outcome {
    client.collection::<R>().delete_all()
}

fn empty_after_delete<R: Sample>(client: &BackendClient) -> Outcome {
    let collection = client.collection::<R>();
    collection.delete_all()?;
    ensure_len(R::LIST_NAME, &collection.list_all()?, 0)
}

fn adds_to_list<R: Sample>(client: &BackendClient) -> Outcome {
    create::<R>(client, "walk the dog")?;
    let all = client.collection::<R>().list_all()?;
    ensure_len(R::LIST_NAME, &all, 1)?;
    ensure_eq("the listed title", "walk the dog", first(R::LIST_NAME, &all)?.title())
}

fn has_an_id<R: Sample>(client: &BackendClient) -> Outcome {
    let created = create::<R>(client, "blah")?;
    ensure_id(R::NAME, created.id())
}

fn id_retrieves<R: Sample>(client: &BackendClient) -> Outcome {
    let created = create::<R>(client, "blah")?;
    let fetched = client.collection::<R>().fetch_by_id(created.id())?;
    ensure_eq("the fetched id", created.id(), fetched.id())
}

fn has_a_url<R: Sample>(client: &BackendClient) -> Outcome {
    let created = create::<R>(client, "blah")?;
    ensure_url(R::NAME, created.url())?;
    let all = client.collection::<R>().list_all()?;
    ensure_url(R::NAME, first(R::LIST_NAME, &all)?.url())
}

fn url_returns<R: Sample>(client: &BackendClient) -> Outcome {
    let created = create::<R>(client, "my resource")?;
    let fetched = client.collection::<R>().fetch(created.url())?;
    ensure_eq("the fetched title", "my resource", fetched.title())
}

fn navigate_via_urls<R: Sample>(client: &BackendClient) -> Outcome {
    create::<R>(client, "the first")?;
    create::<R>(client, "the second")?;
    let collection = client.collection::<R>();
    let all = collection.list_all()?;
    ensure_len(R::LIST_NAME, &all, 2)?;
    let listed = first(R::LIST_NAME, &all)?;
    let fetched = collection.fetch(listed.url())?;
    ensure_eq("the fetched title", listed.title(), fetched.title())
}

fn patch_title<R: Sample>(client: &BackendClient) -> Outcome {
    let created = create::<R>(client, "initial title")?;
    let patched = client
        .collection::<R>()
        .update(created.url(), &R::retitled("bathe the cat"))?;
    ensure_eq("the patched title", "bathe the cat", patched.title())
}

fn title_change_persisted<R: Sample>(client: &BackendClient) -> Outcome {
    let collection = client.collection::<R>();
    let created = create::<R>(client, "blah")?;
    let patched = collection.update(created.url(), &R::retitled("changed title"))?;

    let refetched = collection.fetch(patched.url())?;
    ensure_eq("the re-fetched title", "changed title", refetched.title())?;

    let all = collection.list_all()?;
    ensure_len(R::LIST_NAME, &all, 1)?;
    ensure_eq("the listed title", "changed title", first(R::LIST_NAME, &all)?.title())
}

fn delete_via_url<R: Sample>(client: &BackendClient) -> Outcome {
    let collection = client.collection::<R>();
    let created = create::<R>(client, "blah")?;
    collection.delete_one(created.url())?;
    ensure_len(R::LIST_NAME, &collection.list_all()?, 0)
}

fn delete_keeps_siblings<R: Sample>(client: &BackendClient) -> Outcome {
    let collection = client.collection::<R>();
    let doomed = create::<R>(client, "doomed")?;
    let survivor = create::<R>(client, "survivor")?;
    collection.delete_one(doomed.url())?;

    let all = collection.list_all()?;
    ensure_len(R::LIST_NAME, &all, 1)?;
    let remaining = first(R::LIST_NAME, &all)?;
    ensure_eq("the remaining id", survivor.id(), remaining.id())?;
    ensure_eq("the remaining title", "survivor", remaining.title())
}
