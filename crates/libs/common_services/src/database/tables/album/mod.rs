pub mod album_collaborator;
