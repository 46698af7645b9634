use braindump_core::db::open_db_in_memory;
use braindump_core::{
    NoteService, ServiceError, Session, SqliteNoteRepository, SqliteTagRepository, TagColor,
    TagService,
};
use uuid::Uuid;

#[test]
fn saving_twice_keeps_note_id_and_replaces_content() {
    let conn = open_db_in_memory().unwrap();
    let tags = TagService::new(SqliteTagRepository::try_new(&conn).unwrap());
    let notes = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
    let user = Session::new(Uuid::new_v4());
    let session = Some(&user);
    let tag = tags.create_tag(session, "Reading", TagColor::Indigo).unwrap();

    let first = notes.set_note(session, tag.id, "chapter 3").unwrap();
    let second = notes.set_note(session, tag.id, "chapter 4\n\nthen 5").unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.content, "chapter 4\n\nthen 5");
    let fetched = notes.get_note(session, tag.id).unwrap().unwrap();
    assert_eq!(fetched, second);

    let cleared = notes.set_note(session, tag.id, "").unwrap();
    assert_eq!(cleared.id, first.id);
    assert_eq!(cleared.content, "");
}

#[test]
fn notes_by_tag_covers_only_the_owner() {
    let conn = open_db_in_memory().unwrap();
    let tags = TagService::new(SqliteTagRepository::try_new(&conn).unwrap());
    let notes = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
    let alice = Session::new(Uuid::new_v4());
    let bob = Session::new(Uuid::new_v4());

    let work = tags.create_tag(Some(&alice), "Work", TagColor::Red).unwrap();
    let gym = tags.create_tag(Some(&alice), "Gym", TagColor::Green).unwrap();
    let bobs = tags.create_tag(Some(&bob), "Bob", TagColor::Yellow).unwrap();
    notes.set_note(Some(&alice), work.id, "ship it").unwrap();
    notes.set_note(Some(&alice), gym.id, "legs").unwrap();
    notes.set_note(Some(&bob), bobs.id, "private").unwrap();

    let by_tag = notes.notes_by_tag(Some(&alice)).unwrap();
    assert_eq!(by_tag.len(), 2);
    assert_eq!(by_tag[&work.id].content, "ship it");
    assert_eq!(by_tag[&gym.id].content, "legs");
    assert!(!by_tag.contains_key(&bobs.id));

    assert!(notes.get_note(Some(&alice), bobs.id).unwrap().is_none());
}

#[test]
fn notes_require_an_owned_tag_and_a_session() {
    let conn = open_db_in_memory().unwrap();
    let tags = TagService::new(SqliteTagRepository::try_new(&conn).unwrap());
    let notes = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
    let alice = Session::new(Uuid::new_v4());
    let bob = Session::new(Uuid::new_v4());
    let tag = tags.create_tag(Some(&alice), "Ideas", TagColor::Pink).unwrap();

    assert!(matches!(
        notes.set_note(Some(&bob), tag.id, "hijack"),
        Err(ServiceError::TagNotFound(_))
    ));
    assert!(matches!(
        notes.set_note(None, tag.id, "anon"),
        Err(ServiceError::AuthRequired)
    ));
    assert!(matches!(
        notes.notes_by_tag(None),
        Err(ServiceError::AuthRequired)
    ));
}
