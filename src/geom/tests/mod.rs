mod test_mesh_basic;
