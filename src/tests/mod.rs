mod test_animation;
