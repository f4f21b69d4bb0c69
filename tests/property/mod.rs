mod path_laws;
