mod historic_query_test;
mod migrations_test;
mod profile_crud_test;
mod rating_events_test;
